use decode_persistence::{KeyValueStore, RangeOrder, StoreResult};
use decode_types::ScoreBoardEntry;
use std::sync::Arc;
use tracing::debug;

use crate::keys::KeyLayout;

/// Global leaderboard: one sorted set of username -> cumulative points.
#[derive(Clone)]
pub struct ScoreBoard {
    store: Arc<dyn KeyValueStore>,
    keys: KeyLayout,
}

impl ScoreBoard {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: KeyLayout) -> Self {
        Self { store, keys }
    }

    /// Add `amount` to the user's total and return the new total.
    pub async fn increment(&self, username: &str, amount: i64) -> StoreResult<i64> {
        let total = self
            .store
            .zincr_by(&self.keys.scoreboard(), username, amount)
            .await?;
        debug!("Score for {} is now {} (+{})", username, total, amount);
        Ok(total)
    }

    pub async fn score(&self, username: &str) -> StoreResult<i64> {
        let score = self.store.zscore(&self.keys.scoreboard(), username).await?;
        Ok(score.unwrap_or(0))
    }

    /// Highest scores first; equal scores are ordered by username.
    pub async fn top(&self, limit: usize) -> StoreResult<Vec<ScoreBoardEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let entries = self
            .store
            .zrange(
                &self.keys.scoreboard(),
                0,
                i64::try_from(limit).unwrap_or(i64::MAX) - 1,
                RangeOrder::Descending,
            )
            .await?;

        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| ScoreBoardEntry {
                username: entry.member,
                score: entry.score,
                rank: (index + 1) as u32,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decode_persistence::MemoryStore;

    fn score_board() -> ScoreBoard {
        ScoreBoard::new(Arc::new(MemoryStore::new()), KeyLayout::default())
    }

    #[tokio::test]
    async fn test_increment_returns_running_total() {
        let board = score_board();

        assert_eq!(board.increment("alice", 5).await.unwrap(), 5);
        assert_eq!(board.increment("alice", 3).await.unwrap(), 8);
        assert_eq!(board.score("alice").await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_unknown_user_scores_zero() {
        let board = score_board();
        assert_eq!(board.score("nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_top_three() {
        let board = score_board();
        for (user, points) in [("a", 10), ("b", 30), ("c", 20), ("d", 5)] {
            board.increment(user, points).await.unwrap();
        }

        let top = board.top(3).await.unwrap();
        let names: Vec<_> = top.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[2].rank, 3);
        assert_eq!(top[2].score, 10);
    }

    #[tokio::test]
    async fn test_top_limits() {
        let board = score_board();
        board.increment("a", 1).await.unwrap();

        assert!(board.top(0).await.unwrap().is_empty());
        assert_eq!(board.top(10).await.unwrap().len(), 1);
        assert_eq!(board.top(usize::MAX).await.unwrap().len(), 1);
    }
}
