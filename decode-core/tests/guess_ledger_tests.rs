mod common;

use chrono::Utc;
use common::*;
use decode_core::{GuessLedger, Job, KeyLayout, RewardSettings, ScoreBoard};
use decode_persistence::MemoryStore;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_mixed_case_guesses_share_a_tally() {
    let game = TestGame::new();
    game.seed_post("t3_cat", "artist", "cat").await;

    let first = game.service.submit_guess("t3_cat", "u1", "dog").await.unwrap();
    let second = game.service.submit_guess("t3_cat", "u2", "Cat").await.unwrap();
    let third = game.service.submit_guess("t3_cat", "u1", "cat").await.unwrap();

    assert!(!first.is_correct);
    assert_eq!(first.awarded_points, 0);

    assert!(second.is_correct);
    assert!(second.is_first_solve);
    assert_eq!(second.awarded_points, 11);

    assert!(third.is_correct);
    assert!(!third.is_first_solve);
    assert_eq!(third.awarded_points, 1);

    let guesses = game.service.ledger().post_guesses("t3_cat").await.unwrap();
    assert_eq!(guesses.guesses.get("dog"), Some(&1));
    assert_eq!(guesses.guesses.get("cat"), Some(&2));
    assert!(!guesses.guesses.contains_key("Cat"));
    assert_eq!(guesses.word_count, 2);
    assert_eq!(guesses.guess_count, 3);

    assert_eq!(game.score("u2").await, 11);
    assert_eq!(game.score("u1").await, 1);
    assert_eq!(game.score("artist").await, 2);
}

#[tokio::test]
async fn test_author_is_paid_for_every_correct_guess() {
    let game = TestGame::new();
    game.seed_post("t3_sun", "artist", "sun").await;

    for guesser in ["a", "b", "c", "d"] {
        game.service.submit_guess("t3_sun", guesser, "sun").await.unwrap();
    }
    game.service.submit_guess("t3_sun", "e", "moon").await.unwrap();

    assert_eq!(game.score("artist").await, 4);
    assert_eq!(game.score("a").await, 11);
    assert_eq!(game.score("d").await, 1);
    assert_eq!(game.score("e").await, 0);

    let post = game.service.posts().get_post("t3_sun").await.unwrap().unwrap();
    assert_eq!(post.solve_count, 4);
}

#[tokio::test]
async fn test_first_solver_comment_scheduled_once() {
    let game = TestGame::new();
    game.seed_post("t3_tree", "artist", "tree").await;

    game.service.submit_guess("t3_tree", "early", "bush").await.unwrap();
    game.service.submit_guess("t3_tree", "alice", "TREE").await.unwrap();
    game.service.submit_guess("t3_tree", "bob", "tree").await.unwrap();

    let jobs = game.scheduler.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(
        jobs[0].job,
        Job::FirstSolverComment {
            post_id: "t3_tree".to_string(),
            username: "alice".to_string(),
        }
    );

    let delay = jobs[0].run_at - Utc::now();
    assert!(delay.num_seconds() > 4 * 60);
    assert!(delay.num_seconds() <= 5 * 60);
}

#[tokio::test]
async fn test_scheduler_failure_keeps_points() {
    let store = Arc::new(MemoryStore::new());
    let keys = KeyLayout::default();
    let score_board = ScoreBoard::new(store.clone(), keys.clone());
    let ledger = GuessLedger::new(
        store.clone(),
        keys.clone(),
        score_board.clone(),
        Arc::new(FailingScheduler),
        RewardSettings::default(),
    );

    let posts = decode_core::PostStore::new(store, keys);
    posts
        .create_post(&create_new_post("t3_fish", "artist", "fish"))
        .await
        .unwrap();
    let post = posts.get_post("t3_fish").await.unwrap().unwrap();

    let outcome = ledger.record_guess(&post, "alice", "fish").await.unwrap();

    assert!(outcome.is_first_solve);
    assert_eq!(score_board.score("alice").await.unwrap(), 11);
    assert_eq!(score_board.score("artist").await.unwrap(), 1);
    assert!(ledger.has_solved("t3_fish", "alice").await.unwrap());
}

#[tokio::test]
async fn test_author_guessing_own_post_collects_both_rewards() {
    let game = TestGame::new();
    game.seed_post("t3_own", "artist", "boat").await;

    let outcome = game.service.submit_guess("t3_own", "artist", "boat").await.unwrap();

    assert_eq!(outcome.awarded_points, 11);
    assert_eq!(game.score("artist").await, 12);
}

#[tokio::test]
async fn test_player_count_is_distinct_guessers() {
    let game = TestGame::new();
    game.seed_post("t3_car", "artist", "car").await;

    for (user, guess) in [("u1", "bus"), ("u1", "van"), ("u2", "car"), ("u1", "car")] {
        game.service.submit_guess("t3_car", user, guess).await.unwrap();
    }

    let ledger = game.service.ledger();
    assert_eq!(ledger.player_count("t3_car").await.unwrap(), 2);
    assert_eq!(ledger.user_guess_count("t3_car", "u1").await.unwrap(), 3);
    assert_eq!(ledger.user_guess_count("t3_car", "u2").await.unwrap(), 1);
    assert_eq!(ledger.user_guess_count("t3_car", "nobody").await.unwrap(), 0);
    assert!(ledger.has_solved("t3_car", "u1").await.unwrap());
    assert!(!ledger.has_solved("t3_car", "nobody").await.unwrap());
}

#[tokio::test]
async fn test_custom_reward_values() {
    let game = TestGame::with_rewards(RewardSettings {
        guesser_reward_for_solve: 2,
        guesser_reward_for_first_solve: 5,
        author_reward_for_correct_guess: 3,
        author_reward_for_submit: 0,
    });
    game.seed_post("t3_hat", "artist", "hat").await;

    let first = game.service.submit_guess("t3_hat", "a", "hat").await.unwrap();
    let second = game.service.submit_guess("t3_hat", "b", "hat").await.unwrap();

    assert_eq!(first.awarded_points, 7);
    assert_eq!(second.awarded_points, 2);
    assert_eq!(game.score("artist").await, 6);
}

#[tokio::test]
async fn test_whitespace_is_part_of_the_guess() {
    let game = TestGame::new();
    game.seed_post("t3_pig", "artist", "pig").await;

    let outcome = game.service.submit_guess("t3_pig", "u1", " pig").await.unwrap();

    assert!(!outcome.is_correct);
    let guesses = game.service.ledger().post_guesses("t3_pig").await.unwrap();
    assert_eq!(guesses.guesses.get(" pig"), Some(&1));
}

#[tokio::test]
async fn test_acknowledgment_delay_is_configurable() {
    let store = Arc::new(MemoryStore::new());
    let keys = KeyLayout::default();
    let scheduler = Arc::new(RecordingScheduler::default());
    let ledger = GuessLedger::new(
        store.clone(),
        keys.clone(),
        ScoreBoard::new(store.clone(), keys.clone()),
        scheduler.clone(),
        RewardSettings::default(),
    )
    .with_acknowledgment_delay(Duration::from_secs(30));

    let posts = decode_core::PostStore::new(store, keys);
    posts
        .create_post(&create_new_post("t3_owl", "artist", "owl"))
        .await
        .unwrap();
    let post = posts.get_post("t3_owl").await.unwrap().unwrap();
    ledger.record_guess(&post, "alice", "owl").await.unwrap();

    let jobs = scheduler.jobs();
    assert_eq!(jobs.len(), 1);
    assert!((jobs[0].run_at - Utc::now()).num_seconds() <= 30);
}
