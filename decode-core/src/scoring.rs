use decode_types::GuessOutcome;
use serde::{Deserialize, Serialize};

/// Point values for every scoring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSettings {
    pub guesser_reward_for_solve: i64,
    pub guesser_reward_for_first_solve: i64,
    pub author_reward_for_correct_guess: i64,
    pub author_reward_for_submit: i64,
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            guesser_reward_for_solve: 1,
            guesser_reward_for_first_solve: 10,
            author_reward_for_correct_guess: 1,
            author_reward_for_submit: 1,
        }
    }
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Guesses are tallied and compared in lowercase.
    pub fn normalize_guess(guess: &str) -> String {
        guess.to_lowercase()
    }

    pub fn is_correct(guess: &str, target: &str) -> bool {
        guess.to_lowercase() == target.to_lowercase()
    }

    /// Score a guess given the tally for that guess *after* it was counted.
    ///
    /// A correct guess whose tally is exactly 1 is the first solve of the post.
    pub fn evaluate_guess(
        guess: &str,
        target: &str,
        tally_after_increment: i64,
        rewards: &RewardSettings,
    ) -> GuessOutcome {
        let is_correct = Self::is_correct(guess, target);
        let is_first_solve = is_correct && tally_after_increment == 1;

        let awarded_points = match (is_correct, is_first_solve) {
            (true, true) => {
                rewards.guesser_reward_for_solve + rewards.guesser_reward_for_first_solve
            }
            (true, false) => rewards.guesser_reward_for_solve,
            (false, _) => 0,
        };

        GuessOutcome {
            is_correct,
            is_first_solve,
            awarded_points,
        }
    }
}
