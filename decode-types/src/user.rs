use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Username;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreBoardEntry {
    pub username: Username,
    #[ts(type = "number")]
    pub score: i64,
    pub rank: u32,
}

/// Where one user stands on one post.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserPostState {
    #[ts(type = "number")]
    pub score: i64,
    pub solved: bool,
    pub skipped: bool,
    #[ts(type = "number")]
    pub guess_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameSettings {
    pub subreddit_name: String,
    pub selected_dictionary: String,
}
