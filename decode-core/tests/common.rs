#![allow(dead_code)]

use async_trait::async_trait;
use decode_core::{
    GameService, KeyLayout, PostStore, RewardSettings, ScheduledJob, Scheduler, SchedulerError,
    ServiceSettings,
};
use decode_persistence::{
    KeyValueStore, MemoryStore, RangeOrder, SetOptions, SortedSetEntry, StoreError, StoreResult,
};
use decode_types::NewPost;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Scheduler that keeps every job it is handed
#[derive(Default)]
pub struct RecordingScheduler {
    jobs: Mutex<Vec<ScheduledJob>>,
}

impl RecordingScheduler {
    pub fn jobs(&self) -> Vec<ScheduledJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Scheduler for RecordingScheduler {
    async fn schedule(&self, job: ScheduledJob) -> Result<(), SchedulerError> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

/// Scheduler that rejects everything
pub struct FailingScheduler;

#[async_trait]
impl Scheduler for FailingScheduler {
    async fn schedule(&self, job: ScheduledJob) -> Result<(), SchedulerError> {
        Err(SchedulerError::Rejected {
            job_id: job.id,
            reason: "scheduler offline".to_string(),
        })
    }
}

/// Store whose every operation fails
pub struct FailingStore;

fn offline<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("store offline".to_string()))
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        offline()
    }

    async fn set(&self, _key: &str, _value: &str, _options: SetOptions) -> StoreResult<bool> {
        offline()
    }

    async fn hget(&self, _key: &str, _field: &str) -> StoreResult<Option<String>> {
        offline()
    }

    async fn hset(&self, _key: &str, _fields: Vec<(String, String)>) -> StoreResult<()> {
        offline()
    }

    async fn hget_all(&self, _key: &str) -> StoreResult<HashMap<String, String>> {
        offline()
    }

    async fn zincr_by(&self, _key: &str, _member: &str, _delta: i64) -> StoreResult<i64> {
        offline()
    }

    async fn zadd(&self, _key: &str, _member: &str, _score: i64) -> StoreResult<()> {
        offline()
    }

    async fn zcard(&self, _key: &str) -> StoreResult<u64> {
        offline()
    }

    async fn zscore(&self, _key: &str, _member: &str) -> StoreResult<Option<i64>> {
        offline()
    }

    async fn zrange(
        &self,
        _key: &str,
        _start: i64,
        _stop: i64,
        _order: RangeOrder,
    ) -> StoreResult<Vec<SortedSetEntry>> {
        offline()
    }
}

pub fn create_new_post(post_id: &str, author: &str, word: &str) -> NewPost {
    NewPost {
        post_id: post_id.to_string(),
        author_username: author.to_string(),
        word: word.to_string(),
        images: vec![format!("https://i.redd.it/{}.png", post_id)],
    }
}

pub struct TestGame {
    pub store: Arc<MemoryStore>,
    pub scheduler: Arc<RecordingScheduler>,
    pub service: GameService,
}

impl TestGame {
    pub fn new() -> Self {
        Self::with_rewards(RewardSettings::default())
    }

    pub fn with_rewards(rewards: RewardSettings) -> Self {
        let store = Arc::new(MemoryStore::new());
        let scheduler = Arc::new(RecordingScheduler::default());
        let settings = ServiceSettings {
            rewards,
            ..ServiceSettings::default()
        };
        let service = GameService::new(
            store.clone(),
            KeyLayout::default(),
            scheduler.clone(),
            settings,
        );

        Self {
            store,
            scheduler,
            service,
        }
    }

    pub fn posts(&self) -> PostStore {
        PostStore::new(self.store.clone(), KeyLayout::default())
    }

    /// Seed a drawing post without going through the submission gate or
    /// paying the author for submitting.
    pub async fn seed_post(&self, post_id: &str, author: &str, word: &str) {
        self.posts()
            .create_post(&create_new_post(post_id, author, word))
            .await
            .unwrap();
    }

    pub async fn score(&self, username: &str) -> i64 {
        self.service.score_board().score(username).await.unwrap()
    }
}
