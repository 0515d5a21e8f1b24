use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::HashMap;
use tokio::time::Instant;

use super::{
    KeyValueStore, RangeOrder, SetOptions, SortedSetEntry, compare_entries, resolve_rank_range,
};
use crate::StoreResult;

#[derive(Debug, Clone)]
struct StringEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl StringEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Process-local store. Each call holds one dashmap shard lock for its key,
/// which is what makes increments atomic. Expiry follows the tokio clock so
/// tests can pause and advance time.
#[derive(Debug, Default)]
pub struct MemoryStore {
    strings: DashMap<String, StringEntry>,
    hashes: DashMap<String, HashMap<String, String>>,
    sorted_sets: DashMap<String, HashMap<String, i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let now = Instant::now();
        match self.strings.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            _ => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, options: SetOptions) -> StoreResult<bool> {
        let now = Instant::now();
        let entry = StringEntry {
            value: value.to_string(),
            expires_at: options.ttl.map(|ttl| now + ttl),
        };

        match self.strings.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if options.only_if_absent && occupied.get().is_live(now) {
                    return Ok(false);
                }
                occupied.insert(entry);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
            }
        }

        Ok(true)
    }

    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        Ok(self
            .hashes
            .get(key)
            .and_then(|hash| hash.get(field).cloned()))
    }

    async fn hset(&self, key: &str, fields: Vec<(String, String)>) -> StoreResult<()> {
        let mut hash = self.hashes.entry(key.to_string()).or_default();
        hash.extend(fields);
        Ok(())
    }

    async fn hget_all(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        Ok(self
            .hashes
            .get(key)
            .map(|hash| hash.value().clone())
            .unwrap_or_default())
    }

    async fn zincr_by(&self, key: &str, member: &str, delta: i64) -> StoreResult<i64> {
        let mut set = self.sorted_sets.entry(key.to_string()).or_default();
        let score = set.entry(member.to_string()).or_insert(0);
        *score += delta;
        Ok(*score)
    }

    async fn zadd(&self, key: &str, member: &str, score: i64) -> StoreResult<()> {
        self.sorted_sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn zcard(&self, key: &str) -> StoreResult<u64> {
        Ok(self
            .sorted_sets
            .get(key)
            .map_or(0, |set| set.len() as u64))
    }

    async fn zscore(&self, key: &str, member: &str) -> StoreResult<Option<i64>> {
        Ok(self
            .sorted_sets
            .get(key)
            .and_then(|set| set.get(member).copied()))
    }

    async fn zrange(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        order: RangeOrder,
    ) -> StoreResult<Vec<SortedSetEntry>> {
        let mut entries: Vec<SortedSetEntry> = match self.sorted_sets.get(key) {
            Some(set) => set
                .iter()
                .map(|(member, score)| SortedSetEntry {
                    member: member.clone(),
                    score: *score,
                })
                .collect(),
            None => return Ok(Vec::new()),
        };

        let Some((start, stop)) = resolve_rank_range(entries.len() as u64, start, stop) else {
            return Ok(Vec::new());
        };

        entries.sort_by(|a, b| compare_entries(a, b, order));
        Ok(entries
            .into_iter()
            .skip(start as usize)
            .take((stop - start + 1) as usize)
            .collect())
    }
}
