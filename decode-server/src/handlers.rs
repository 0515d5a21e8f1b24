use decode_core::{ContentApi, GameService, ServiceError};
use decode_types::{
    ApiError, CreatePostRequest, GuessResponse, InstallRequest, PublishCollectionRequest,
    SkipPostRequest, SubmitGuessRequest, SubmitPostOutcome, UserScoreResponse, UsernameResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

type JsonReply = Result<WithStatus<Json>, warp::Rejection>;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    limit: Option<usize>,
}

impl LimitQuery {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }
}

fn json_reply<T: serde::Serialize>(body: &T, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(body), status)
}

pub(crate) fn error_reply(err: ServiceError) -> WithStatus<Json> {
    let (status, body) = match err {
        ServiceError::PostNotFound { post_id } => {
            (StatusCode::NOT_FOUND, ApiError::PostNotFound { post_id })
        }
        ServiceError::EmptyGuess => (StatusCode::BAD_REQUEST, ApiError::EmptyGuess),
        ServiceError::InvalidPost(reason) => {
            (StatusCode::BAD_REQUEST, ApiError::InvalidRequest { reason })
        }
        ServiceError::Store(e) => {
            tracing::error!("Store failure: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::StoreUnavailable {
                    message: e.to_string(),
                },
            )
        }
        ServiceError::Content(e) => {
            tracing::error!("Content API failure: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::UpstreamUnavailable {
                    message: e.to_string(),
                },
            )
        }
    };
    json_reply(&body, status)
}

pub async fn handle_submit_post(
    request: CreatePostRequest,
    service: Arc<GameService>,
) -> JsonReply {
    let author = request.author_username.clone();
    match service.submit_post(request).await {
        Ok(outcome @ SubmitPostOutcome::Created { .. }) => {
            Ok(json_reply(&outcome, StatusCode::CREATED))
        }
        Ok(SubmitPostOutcome::Debounced) => Ok(json_reply(
            &ApiError::SubmissionLocked { username: author },
            StatusCode::TOO_MANY_REQUESTS,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn handle_post_view(post_id: String, service: Arc<GameService>) -> JsonReply {
    match service.post_view(&post_id).await {
        Ok(Some(view)) => Ok(json_reply(&view, StatusCode::OK)),
        Ok(None) => Ok(error_reply(ServiceError::PostNotFound { post_id })),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn handle_submit_guess(
    post_id: String,
    request: SubmitGuessRequest,
    service: Arc<GameService>,
) -> JsonReply {
    match service
        .submit_guess(&post_id, &request.username, &request.guess)
        .await
    {
        Ok(outcome) => Ok(json_reply(&GuessResponse { outcome }, StatusCode::OK)),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn handle_skip_post(
    post_id: String,
    request: SkipPostRequest,
    service: Arc<GameService>,
) -> JsonReply {
    match service.skip_post(&post_id, &request.username).await {
        Ok(()) => Ok(json_reply(
            &serde_json::json!({ "skipped": true }),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn handle_results(post_id: String, service: Arc<GameService>) -> JsonReply {
    let results = service.results(&post_id).await;
    Ok(json_reply(&results, StatusCode::OK))
}

pub async fn handle_user_state(
    post_id: String,
    username: String,
    service: Arc<GameService>,
) -> JsonReply {
    match service.user_state(&post_id, &username).await {
        Ok(state) => Ok(json_reply(&state, StatusCode::OK)),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn handle_leaderboard(query: LimitQuery, service: Arc<GameService>) -> JsonReply {
    let entries = service.leaderboard(query.limit()).await;
    Ok(json_reply(&entries, StatusCode::OK))
}

pub async fn handle_user_score(username: String, service: Arc<GameService>) -> JsonReply {
    let score = service.user_score(&username).await;
    Ok(json_reply(
        &UserScoreResponse { username, score },
        StatusCode::OK,
    ))
}

pub async fn handle_user_posts(
    username: String,
    query: LimitQuery,
    service: Arc<GameService>,
) -> JsonReply {
    let posts = service.user_posts(&username, query.limit()).await;
    Ok(json_reply(&posts, StatusCode::OK))
}

pub async fn handle_install(request: InstallRequest, service: Arc<GameService>) -> JsonReply {
    match service.install(&request.post_id, &request.settings).await {
        Ok(()) => Ok(json_reply(&request.settings, StatusCode::OK)),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn handle_publish_collection(
    request: PublishCollectionRequest,
    service: Arc<GameService>,
) -> JsonReply {
    match service
        .publish_collection(
            &request.post_id,
            &request.candidate_post_ids,
            request.limit,
            &request.timeframe,
        )
        .await
    {
        Ok(collection) => Ok(json_reply(&collection, StatusCode::CREATED)),
        Err(e) => Ok(error_reply(e)),
    }
}

pub async fn handle_resolve_username(
    user_id: String,
    service: Arc<GameService>,
    content: Arc<dyn ContentApi>,
) -> JsonReply {
    match service.resolve_username(&user_id, content.as_ref()).await {
        Ok(username) => Ok(json_reply(
            &UsernameResponse { user_id, username },
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}
