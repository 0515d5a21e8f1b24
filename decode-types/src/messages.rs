use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameSettings, GuessOutcome, NewPost, PostId, Username};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitGuessRequest {
    pub username: Username,
    pub guess: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SkipPostRequest {
    pub username: Username,
}

pub type CreatePostRequest = NewPost;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstallRequest {
    pub post_id: PostId,
    pub settings: GameSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PublishCollectionRequest {
    pub post_id: PostId,
    pub candidate_post_ids: Vec<PostId>,
    pub limit: usize,
    pub timeframe: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SubmitPostOutcome {
    Created { post_id: PostId },
    Debounced,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessResponse {
    pub outcome: GuessOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserScoreResponse {
    pub username: Username,
    #[ts(type = "number")]
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UsernameResponse {
    pub user_id: String,
    pub username: Option<Username>,
}
