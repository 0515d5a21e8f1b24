use decode_core::{ContentApi, GameService};
use std::sync::Arc;
use warp::Filter;

pub mod config;
pub mod content;
pub mod handlers;

use handlers::*;

const MAX_BODY_BYTES: u64 = 64 * 1024;

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

pub fn create_routes(
    service: Arc<GameService>,
    content: Arc<dyn ContentApi>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let service_filter = warp::any().map({
        let service = service.clone();
        move || service.clone()
    });

    let content_filter = warp::any().map({
        let content = content.clone();
        move || content.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    let submit_post = warp::path!("api" / "posts")
        .and(warp::post())
        .and(json_body())
        .and(service_filter.clone())
        .and_then(handle_submit_post);

    let post_view = warp::path!("api" / "posts" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_post_view);

    let submit_guess = warp::path!("api" / "posts" / String / "guesses")
        .and(warp::post())
        .and(json_body())
        .and(service_filter.clone())
        .and_then(handle_submit_guess);

    let skip_post = warp::path!("api" / "posts" / String / "skip")
        .and(warp::post())
        .and(json_body())
        .and(service_filter.clone())
        .and_then(handle_skip_post);

    let results = warp::path!("api" / "posts" / String / "results")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_results);

    let user_state = warp::path!("api" / "posts" / String / "users" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_user_state);

    let leaderboard = warp::path!("api" / "leaderboard")
        .and(warp::get())
        .and(warp::query::<LimitQuery>())
        .and(service_filter.clone())
        .and_then(handle_leaderboard);

    let user_score = warp::path!("api" / "users" / String / "score")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_user_score);

    let user_posts = warp::path!("api" / "users" / String / "posts")
        .and(warp::get())
        .and(warp::query::<LimitQuery>())
        .and(service_filter.clone())
        .and_then(handle_user_posts);

    let install = warp::path!("api" / "install")
        .and(warp::post())
        .and(json_body())
        .and(service_filter.clone())
        .and_then(handle_install);

    let publish_collection = warp::path!("api" / "collections")
        .and(warp::post())
        .and(json_body())
        .and(service_filter.clone())
        .and_then(handle_publish_collection);

    let resolve_username = warp::path!("api" / "usernames" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and(content_filter)
        .and_then(handle_resolve_username);

    let posts = submit_post
        .or(post_view)
        .or(submit_guess)
        .or(skip_post)
        .or(results)
        .or(user_state);

    let users = leaderboard
        .or(user_score)
        .or(user_posts)
        .or(resolve_username);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(posts)
        .or(users)
        .or(install)
        .or(publish_collection)
        .with(cors)
        .with(warp::log("photodecode"))
}
