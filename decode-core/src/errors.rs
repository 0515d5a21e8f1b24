use decode_persistence::StoreError;

use crate::content::ContentError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("post {post_id} not found")]
    PostNotFound { post_id: String },

    #[error("guess must not be empty")]
    EmptyGuess,

    #[error("invalid post: {0}")]
    InvalidPost(String),
}
