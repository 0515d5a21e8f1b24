use async_trait::async_trait;
use decode_core::{ContentApi, ContentError};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct CommentRequest<'a> {
    post_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    username: String,
}

/// HTTP client for the platform's content API.
pub struct RedditContentClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RedditContentClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ContentApi for RedditContentClient {
    async fn submit_comment(&self, post_id: &str, text: &str) -> Result<String, ContentError> {
        let url = format!("{}/comments", self.base_url);
        debug!("Submitting comment on {} via {}", post_id, url);

        let response = self
            .authorize(self.client.post(&url))
            .json(&CommentRequest { post_id, text })
            .send()
            .await
            .map_err(|e| ContentError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ContentError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let comment: CommentResponse = response
            .json()
            .await
            .map_err(|e| ContentError::Decode(e.to_string()))?;
        Ok(comment.id)
    }

    async fn username_for_id(&self, user_id: &str) -> Result<Option<String>, ContentError> {
        let url = format!("{}/users/{}", self.base_url, user_id);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ContentError::Request(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ContentError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| ContentError::Decode(e.to_string()))?;
        Ok(Some(user.username))
    }
}

/// Logs instead of calling out. Usernames resolve to the id with its `t2_` prefix
/// stripped, which is enough for local play.
#[derive(Debug, Default)]
pub struct DevContentApi;

#[async_trait]
impl ContentApi for DevContentApi {
    async fn submit_comment(&self, post_id: &str, text: &str) -> Result<String, ContentError> {
        info!("[dev] comment on {}: {}", post_id, text);
        Ok(format!("dev_{}", post_id))
    }

    async fn username_for_id(&self, user_id: &str) -> Result<Option<String>, ContentError> {
        Ok(Some(
            user_id.strip_prefix("t2_").unwrap_or(user_id).to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dev_content_strips_account_prefix() {
        let content = DevContentApi;

        assert_eq!(
            content.username_for_id("t2_alice").await.unwrap(),
            Some("alice".to_string())
        );
        assert_eq!(
            content.username_for_id("bob").await.unwrap(),
            Some("bob".to_string())
        );
        assert_eq!(
            content.submit_comment("t3_a", "hello").await.unwrap(),
            "dev_t3_a"
        );
    }

    #[tokio::test]
    async fn test_unreachable_content_api_is_request_error() {
        let content = RedditContentClient::new("http://127.0.0.1:9/", None);

        let result = content.submit_comment("t3_a", "hello").await;
        assert!(matches!(result, Err(ContentError::Request(_))));
    }
}
