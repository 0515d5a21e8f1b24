use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessOutcome {
    pub is_correct: bool,
    pub is_first_solve: bool,
    #[ts(type = "number")]
    pub awarded_points: i64,
}

/// Aggregated tally of every guess made on a post.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PostGuesses {
    #[ts(type = "Record<string, number>")]
    pub guesses: BTreeMap<String, u64>,
    #[ts(type = "number")]
    pub word_count: u64,  // Distinct guess strings
    #[ts(type = "number")]
    pub guess_count: u64, // Total guesses
}

impl PostGuesses {
    /// Top `n` guesses by count, ties in alphabetical order.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .guesses
            .iter()
            .map(|(guess, count)| (guess.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }

    /// Share of all guesses, rounded to a whole percentage.
    pub fn percentage(&self, guess: &str) -> u32 {
        if self.guess_count == 0 {
            return 0;
        }
        let count = self.guesses.get(guess).copied().unwrap_or(0);
        ((count as f64 / self.guess_count as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PostResults {
    #[ts(type = "number")]
    pub player_count: u64,
    pub guesses: PostGuesses,
}
