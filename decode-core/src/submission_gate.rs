use decode_persistence::{KeyValueStore, SetOptions, StoreResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::keys::KeyLayout;

pub const DEFAULT_SUBMISSION_LOCK: Duration = Duration::from_secs(20);

/// Short-lived per-user lock that swallows rapid repeat submissions.
///
/// Losing a lock only lets a duplicate post through; nothing else depends on it.
#[derive(Clone)]
pub struct SubmissionGate {
    store: Arc<dyn KeyValueStore>,
    keys: KeyLayout,
    ttl: Duration,
}

impl SubmissionGate {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: KeyLayout, ttl: Duration) -> Self {
        Self { store, keys, ttl }
    }

    pub async fn try_acquire(&self, username: &str) -> StoreResult<bool> {
        let acquired = self
            .store
            .set(
                &self.keys.submission_lock(username),
                "true",
                SetOptions::only_if_absent(self.ttl),
            )
            .await?;

        if !acquired {
            debug!("Submission from {} debounced", username);
        }
        Ok(acquired)
    }
}
