use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::{PostId, Username};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PostType {
    #[default]
    Drawing,
    Pinned,
    Collection,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Drawing => "drawing",
            PostType::Pinned => "pinned",
            PostType::Collection => "collection",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPostType(pub String);

impl fmt::Display for UnknownPostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown post type '{}'", self.0)
    }
}

impl std::error::Error for UnknownPostType {}

impl FromStr for PostType {
    type Err = UnknownPostType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drawing" => Ok(PostType::Drawing),
            "pinned" => Ok(PostType::Pinned),
            "collection" => Ok(PostType::Collection),
            other => Err(UnknownPostType(other.to_string())),
        }
    }
}

/// A guessable image post as stored, with solve/skip counts derived at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PostRecord {
    pub post_id: PostId,
    pub post_type: PostType,
    pub author_username: Username,
    pub word: String,
    pub images: Vec<String>,
    #[ts(type = "number")]
    pub created_at: i64, // Unix millis
    #[ts(type = "number")]
    pub solve_count: u64,
    #[ts(type = "number")]
    pub skip_count: u64,
}

/// Client-facing view of a post. The target word is withheld.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SafePostRecord {
    pub post_id: PostId,
    pub post_type: PostType,
    pub author_username: Username,
    pub images: Vec<String>,
    pub word_length: u32,
    #[ts(type = "number")]
    pub created_at: i64,
    #[ts(type = "number")]
    pub solve_count: u64,
    #[ts(type = "number")]
    pub skip_count: u64,
}

impl From<&PostRecord> for SafePostRecord {
    fn from(post: &PostRecord) -> Self {
        SafePostRecord {
            post_id: post.post_id.clone(),
            post_type: post.post_type,
            author_username: post.author_username.clone(),
            images: post.images.clone(),
            word_length: post.word.chars().count() as u32,
            created_at: post.created_at,
            solve_count: post.solve_count,
            skip_count: post.skip_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPost {
    pub post_id: PostId,
    pub author_username: Username,
    pub word: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PinnedPost {
    pub post_id: PostId,
    pub post_type: PostType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CollectionEntry {
    pub post_id: PostId,
    pub author_username: Username,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CollectionPost {
    pub post_id: PostId,
    pub post_type: PostType,
    pub entries: Vec<CollectionEntry>,
    pub timeframe: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PostImages {
    pub post_id: PostId,
    pub images: Vec<String>,
}

/// What the router renders for a post, chosen by its stored type.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[ts(export)]
pub enum PostView {
    Drawing(SafePostRecord),
    Pinned(PinnedPost),
    Collection(CollectionPost),
}
