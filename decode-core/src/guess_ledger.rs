use decode_persistence::{KeyValueStore, RangeOrder, StoreResult};
use decode_types::{GuessOutcome, PostGuesses, PostRecord};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::keys::KeyLayout;
use crate::post_store::now_millis;
use crate::score_board::ScoreBoard;
use crate::scheduler::{Job, ScheduledJob, Scheduler};
use crate::scoring::{RewardSettings, ScoringEngine};

/// Delay before congratulating the first solver, so the comment does not
/// spoil the answer for people still guessing.
pub const FIRST_SOLVER_COMMENT_DELAY: Duration = Duration::from_secs(5 * 60);

/// Records guesses per post and pays out points for correct ones.
pub struct GuessLedger {
    store: Arc<dyn KeyValueStore>,
    keys: KeyLayout,
    score_board: ScoreBoard,
    scheduler: Arc<dyn Scheduler>,
    rewards: RewardSettings,
    acknowledgment_delay: Duration,
}

impl GuessLedger {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        keys: KeyLayout,
        score_board: ScoreBoard,
        scheduler: Arc<dyn Scheduler>,
        rewards: RewardSettings,
    ) -> Self {
        Self {
            store,
            keys,
            score_board,
            scheduler,
            rewards,
            acknowledgment_delay: FIRST_SOLVER_COMMENT_DELAY,
        }
    }

    pub fn with_acknowledgment_delay(mut self, delay: Duration) -> Self {
        self.acknowledgment_delay = delay;
        self
    }

    /// Count the guess, and if it matches the post's word award the guesser
    /// and the author.
    ///
    /// Each store call is atomic on its own but the sequence is not: a failure
    /// part way through leaves earlier increments in place.
    pub async fn record_guess(
        &self,
        post: &PostRecord,
        username: &str,
        guess: &str,
    ) -> StoreResult<GuessOutcome> {
        let normalized = ScoringEngine::normalize_guess(guess);

        let tally = self
            .store
            .zincr_by(&self.keys.post_guesses(&post.post_id), &normalized, 1)
            .await?;
        self.store
            .zincr_by(&self.keys.user_guess_counter(&post.post_id), username, 1)
            .await?;

        let outcome = ScoringEngine::evaluate_guess(&normalized, &post.word, tally, &self.rewards);
        if !outcome.is_correct {
            debug!(
                "Incorrect guess '{}' from {} on {} (seen {} times)",
                normalized, username, post.post_id, tally
            );
            return Ok(outcome);
        }

        self.store
            .zadd(&self.keys.post_solved(&post.post_id), username, now_millis())
            .await?;

        // Authors earn on every correct guess, not only the first
        self.score_board
            .increment(
                &post.author_username,
                self.rewards.author_reward_for_correct_guess,
            )
            .await?;
        self.score_board
            .increment(username, outcome.awarded_points)
            .await?;

        if outcome.is_first_solve {
            info!("{} is the first to solve {}", username, post.post_id);
            self.schedule_first_solver_comment(&post.post_id, username)
                .await;
        }

        Ok(outcome)
    }

    async fn schedule_first_solver_comment(&self, post_id: &str, username: &str) {
        let job = ScheduledJob::after(
            Job::FirstSolverComment {
                post_id: post_id.to_string(),
                username: username.to_string(),
            },
            self.acknowledgment_delay,
        );

        if let Err(e) = self.scheduler.schedule(job).await {
            warn!(
                "Could not schedule first solver comment for {} on {}: {}",
                username, post_id, e
            );
        }
    }

    /// Every distinct guess with its count.
    pub async fn post_guesses(&self, post_id: &str) -> StoreResult<PostGuesses> {
        let entries = self
            .store
            .zrange(&self.keys.post_guesses(post_id), 0, -1, RangeOrder::Ascending)
            .await?;

        let mut parsed = PostGuesses::default();
        for entry in entries {
            let count = entry.score.max(0) as u64;
            parsed.guesses.insert(entry.member, count);
            parsed.guess_count += count;
            parsed.word_count += 1;
        }

        Ok(parsed)
    }

    /// Distinct users who have guessed on the post.
    pub async fn player_count(&self, post_id: &str) -> StoreResult<u64> {
        self.store
            .zcard(&self.keys.user_guess_counter(post_id))
            .await
    }

    pub async fn user_guess_count(&self, post_id: &str, username: &str) -> StoreResult<i64> {
        let count = self
            .store
            .zscore(&self.keys.user_guess_counter(post_id), username)
            .await?;
        Ok(count.unwrap_or(0))
    }

    pub async fn has_solved(&self, post_id: &str, username: &str) -> StoreResult<bool> {
        let solved = self
            .store
            .zscore(&self.keys.post_solved(post_id), username)
            .await?;
        Ok(solved.is_some())
    }
}
