//! Key-value / sorted-set storage.
//!
//! The game only needs a narrow slice of a Redis-like store: plain strings with
//! optional expiry, hashes, and sorted sets keyed by member. [`KeyValueStore`]
//! captures exactly that capability set so callers can run against the
//! in-memory [`MemoryStore`] in tests and the SQLite-backed [`SqlStore`] in
//! production.
//!
//! Every method is a single atomic operation from the caller's point of view.
//! No method spans more than one key.

mod memory_store;
mod sql_store;

pub use memory_store::MemoryStore;
pub use sql_store::SqlStore;

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use crate::StoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetOptions {
    /// Only write when no live value exists (`SET NX`).
    pub only_if_absent: bool,
    pub ttl: Option<Duration>,
}

impl SetOptions {
    pub fn only_if_absent(ttl: Duration) -> Self {
        Self {
            only_if_absent: true,
            ttl: Some(ttl),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeOrder {
    /// Lowest score first.
    #[default]
    Ascending,
    /// Highest score first.
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedSetEntry {
    pub member: String,
    pub score: i64,
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Returns whether the value was written.
    async fn set(&self, key: &str, value: &str, options: SetOptions) -> StoreResult<bool>;

    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>>;

    async fn hset(&self, key: &str, fields: Vec<(String, String)>) -> StoreResult<()>;

    /// All fields of a hash; empty when the key is absent.
    async fn hget_all(&self, key: &str) -> StoreResult<HashMap<String, String>>;

    /// Add `delta` to `member`'s score, creating it at zero first, and return
    /// the new score.
    async fn zincr_by(&self, key: &str, member: &str, delta: i64) -> StoreResult<i64>;

    /// Insert or overwrite `member` with `score`.
    async fn zadd(&self, key: &str, member: &str, score: i64) -> StoreResult<()>;

    async fn zcard(&self, key: &str) -> StoreResult<u64>;

    async fn zscore(&self, key: &str, member: &str) -> StoreResult<Option<i64>>;

    /// Members between ranks `start` and `stop` inclusive. Negative ranks
    /// count from the end, so `(0, -1)` is the whole set.
    ///
    /// Ties on score are broken by member, ascending, in both orders.
    async fn zrange(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        order: RangeOrder,
    ) -> StoreResult<Vec<SortedSetEntry>>;
}

/// Resolve Redis-style inclusive rank bounds against a set of `len` members.
pub(crate) fn resolve_rank_range(len: u64, start: i64, stop: i64) -> Option<(u64, u64)> {
    if len == 0 {
        return None;
    }
    let len = len as i64;

    let start = if start < 0 { len + start } else { start }.max(0);
    let stop = if stop < 0 { len + stop } else { stop }.min(len - 1);

    if start > stop || start >= len {
        return None;
    }

    Some((start as u64, stop as u64))
}

pub(crate) fn compare_entries(a: &SortedSetEntry, b: &SortedSetEntry, order: RangeOrder) -> Ordering {
    let by_score = match order {
        RangeOrder::Ascending => a.score.cmp(&b.score),
        RangeOrder::Descending => b.score.cmp(&a.score),
    };
    by_score.then_with(|| a.member.cmp(&b.member))
}
