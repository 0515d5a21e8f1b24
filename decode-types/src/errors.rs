use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ApiError {
    PostNotFound { post_id: String },
    SubmissionLocked { username: String },
    EmptyGuess,
    InvalidRequest { reason: String },
    StoreUnavailable { message: String },
    UpstreamUnavailable { message: String },
}
