use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content API request failed: {0}")]
    Request(String),

    #[error("content API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("content API response could not be decoded: {0}")]
    Decode(String),
}

/// The hosting platform's content API, as far as the game needs it.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Post a comment on `post_id`, returning the new comment's id.
    async fn submit_comment(&self, post_id: &str, text: &str) -> Result<String, ContentError>;

    async fn username_for_id(&self, user_id: &str) -> Result<Option<String>, ContentError>;
}
