use decode_persistence::{KeyValueStore, StoreResult};
use std::sync::Arc;
use tracing::debug;

use crate::content::ContentApi;
use crate::errors::ServiceError;
use crate::keys::KeyLayout;

/// Platform user id -> username, filled lazily from the content API.
#[derive(Clone)]
pub struct UsernameCache {
    store: Arc<dyn KeyValueStore>,
    keys: KeyLayout,
}

impl UsernameCache {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: KeyLayout) -> Self {
        Self { store, keys }
    }

    pub async fn get(&self, user_id: &str) -> StoreResult<Option<String>> {
        self.store.hget(&self.keys.username_cache(), user_id).await
    }

    pub async fn put(&self, user_id: &str, username: &str) -> StoreResult<()> {
        self.store
            .hset(
                &self.keys.username_cache(),
                vec![(user_id.to_string(), username.to_string())],
            )
            .await
    }

    pub async fn resolve(
        &self,
        user_id: &str,
        content: &dyn ContentApi,
    ) -> Result<Option<String>, ServiceError> {
        if let Some(username) = self.get(user_id).await? {
            return Ok(Some(username));
        }

        let Some(username) = content.username_for_id(user_id).await? else {
            debug!("No username known for user {}", user_id);
            return Ok(None);
        };

        self.put(user_id, &username).await?;
        Ok(Some(username))
    }
}
