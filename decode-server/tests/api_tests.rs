
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use test_helpers::*;

fn parse(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

async fn create_post(setup: &TestServerSetup, post_id: &str, author: &str, word: &str) {
    let response = warp::test::request()
        .method("POST")
        .path("/api/posts")
        .json(&json!({
            "post_id": post_id,
            "author_username": author,
            "word": word,
            "images": [format!("https://i.redd.it/{}.png", post_id)],
        }))
        .reply(&setup.routes())
        .await;
    assert_eq!(response.status(), 201);
}

async fn guess(setup: &TestServerSetup, post_id: &str, username: &str, guess: &str) -> Value {
    let response = warp::test::request()
        .method("POST")
        .path(&format!("/api/posts/{}/guesses", post_id))
        .json(&json!({ "username": username, "guess": guess }))
        .reply(&setup.routes())
        .await;
    assert_eq!(response.status(), 200);
    parse(response.body())
}

#[tokio::test(start_paused = true)]
async fn test_first_solver_comment_posted_after_delay() {
    let setup = TestServerSetup::new();
    create_post(&setup, "t3_moon", "artist", "moon").await;

    let outcome = guess(&setup, "t3_moon", "alice", "MOON").await;
    assert_eq!(outcome["outcome"]["is_first_solve"], true);
    guess(&setup, "t3_moon", "bob", "moon").await;

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(setup.content.comments().is_empty());

    tokio::time::sleep(Duration::from_secs(5 * 60)).await;
    let comments = setup.content.comments();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].0, "t3_moon");
    assert!(comments[0].1.contains("u/alice"));
}

#[tokio::test]
async fn test_leaderboard_and_user_state() {
    let setup = TestServerSetup::new();
    create_post(&setup, "t3_a", "artist", "apple").await;

    guess(&setup, "t3_a", "zoe", "pear").await;
    guess(&setup, "t3_a", "zoe", "apple").await;
    guess(&setup, "t3_a", "amy", "apple").await;

    let response = warp::test::request()
        .method("GET")
        .path("/api/leaderboard?limit=2")
        .reply(&setup.routes())
        .await;
    let board = parse(response.body());
    assert_eq!(board.as_array().unwrap().len(), 2);
    assert_eq!(board[0]["username"], "zoe");
    assert_eq!(board[0]["score"], 11);
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[1]["username"], "artist");
    assert_eq!(board[1]["score"], 3);

    let response = warp::test::request()
        .method("GET")
        .path("/api/posts/t3_a/users/zoe")
        .reply(&setup.routes())
        .await;
    let state = parse(response.body());
    assert_eq!(state["solved"], true);
    assert_eq!(state["skipped"], false);
    assert_eq!(state["guess_count"], 2);
    assert_eq!(state["score"], 11);
}

#[tokio::test]
async fn test_skip_and_user_posts() {
    let setup = TestServerSetup::new();
    create_post(&setup, "t3_a", "artist", "apple").await;

    let response = warp::test::request()
        .method("POST")
        .path("/api/posts/t3_a/skip")
        .json(&json!({ "username": "bob" }))
        .reply(&setup.routes())
        .await;
    assert_eq!(response.status(), 200);

    let response = warp::test::request()
        .method("GET")
        .path("/api/posts/t3_a/users/bob")
        .reply(&setup.routes())
        .await;
    assert_eq!(parse(response.body())["skipped"], true);

    let response = warp::test::request()
        .method("GET")
        .path("/api/users/artist/posts")
        .reply(&setup.routes())
        .await;
    let posts = parse(response.body());
    assert_eq!(posts[0]["post_id"], "t3_a");
    assert_eq!(posts[0]["images"][0], "https://i.redd.it/t3_a.png");
}

#[tokio::test]
async fn test_install_and_collection() {
    let setup = TestServerSetup::new();
    create_post(&setup, "t3_a", "artist", "apple").await;
    create_post(&setup, "t3_b", "painter", "bear").await;

    let response = warp::test::request()
        .method("POST")
        .path("/api/install")
        .json(&json!({
            "post_id": "t3_pinned",
            "settings": { "subreddit_name": "photodecode", "selected_dictionary": "main" },
        }))
        .reply(&setup.routes())
        .await;
    assert_eq!(response.status(), 200);

    let response = warp::test::request()
        .method("POST")
        .path("/api/collections")
        .json(&json!({
            "post_id": "t3_weekly",
            "candidate_post_ids": ["t3_pinned", "t3_a", "t3_b"],
            "limit": 5,
            "timeframe": "week",
        }))
        .reply(&setup.routes())
        .await;
    assert_eq!(response.status(), 201);
    let collection = parse(response.body());
    assert_eq!(collection["entries"].as_array().unwrap().len(), 2);

    let response = warp::test::request()
        .method("GET")
        .path("/api/posts/t3_pinned")
        .reply(&setup.routes())
        .await;
    assert_eq!(parse(response.body())["kind"], "pinned");

    let response = warp::test::request()
        .method("GET")
        .path("/api/posts/t3_weekly")
        .reply(&setup.routes())
        .await;
    let view = parse(response.body());
    assert_eq!(view["kind"], "collection");
    assert_eq!(view["timeframe"], "week");
}

#[tokio::test]
async fn test_store_outage() {
    let setup = TestServerSetup::with_store(Arc::new(UnavailableStore));

    let response = warp::test::request()
        .method("POST")
        .path("/api/posts/t3_a/guesses")
        .json(&json!({ "username": "alice", "guess": "cat" }))
        .reply(&setup.routes())
        .await;
    assert_eq!(response.status(), 503);
    assert_eq!(
        parse(response.body())["StoreUnavailable"]["message"],
        "store unavailable: connection refused"
    );

    // Polled reads degrade to empty values
    let response = warp::test::request()
        .method("GET")
        .path("/api/leaderboard")
        .reply(&setup.routes())
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(parse(response.body()), json!([]));

    let response = warp::test::request()
        .method("GET")
        .path("/api/users/alice/score")
        .reply(&setup.routes())
        .await;
    assert_eq!(parse(response.body())["score"], 0);
}

#[tokio::test]
async fn test_username_lookup_failure_is_503() {
    let setup = TestServerSetup::new();

    let response = warp::test::request()
        .method("GET")
        .path("/api/usernames/t2_alice")
        .reply(&setup.routes())
        .await;

    assert_eq!(response.status(), 503);
    assert!(parse(response.body()).get("UpstreamUnavailable").is_some());
}
