use decode_persistence::{KeyValueStore, RangeOrder, StoreError, StoreResult};
use decode_types::{
    CollectionEntry, CollectionPost, NewPost, PinnedPost, PostImages, PostRecord, PostType,
};
use futures_util::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::keys::KeyLayout;

// Hash fields of a post record
const FIELD_POST_ID: &str = "postId";
const FIELD_POST_TYPE: &str = "postType";
const FIELD_AUTHOR: &str = "authorUsername";
const FIELD_WORD: &str = "word";
const FIELD_DATA: &str = "data";
const FIELD_DATE: &str = "date";
const FIELD_TIMEFRAME: &str = "timeframe";

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Post metadata plus the solved/skipped sets the counts are derived from.
#[derive(Clone)]
pub struct PostStore {
    store: Arc<dyn KeyValueStore>,
    keys: KeyLayout,
}

impl PostStore {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: KeyLayout) -> Self {
        Self { store, keys }
    }

    /// Persist a new drawing post and return its server timestamp.
    pub async fn create_post(&self, post: &NewPost) -> StoreResult<i64> {
        let created_at = now_millis();
        let images = encode_json(&self.keys.post_data(&post.post_id), &post.images)?;

        self.store
            .hset(
                &self.keys.post_data(&post.post_id),
                vec![
                    (FIELD_POST_ID.to_string(), post.post_id.clone()),
                    (FIELD_DATA.to_string(), images),
                    (FIELD_AUTHOR.to_string(), post.author_username.clone()),
                    (FIELD_DATE.to_string(), created_at.to_string()),
                    (FIELD_WORD.to_string(), post.word.clone()),
                    (
                        FIELD_POST_TYPE.to_string(),
                        PostType::Drawing.as_str().to_string(),
                    ),
                ],
            )
            .await?;

        Ok(created_at)
    }

    pub async fn get_post(&self, post_id: &str) -> StoreResult<Option<PostRecord>> {
        let key = self.keys.post_data(post_id);
        let fields = self.store.hget_all(&key).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        let solve_count = self.store.zcard(&self.keys.post_solved(post_id)).await?;
        let skip_count = self.store.zcard(&self.keys.post_skipped(post_id)).await?;

        Ok(Some(PostRecord {
            post_id: post_id.to_string(),
            post_type: parse_post_type(fields.get(FIELD_POST_TYPE)),
            author_username: field_or_default(&fields, FIELD_AUTHOR),
            word: field_or_default(&fields, FIELD_WORD),
            images: decode_images(&key, fields.get(FIELD_DATA))?,
            created_at: parse_timestamp(&key, fields.get(FIELD_DATE))?,
            solve_count,
            skip_count,
        }))
    }

    /// Stored post type; anything unset or unrecognised is a drawing.
    pub async fn post_type(&self, post_id: &str) -> StoreResult<PostType> {
        let raw = self
            .store
            .hget(&self.keys.post_data(post_id), FIELD_POST_TYPE)
            .await?;
        Ok(parse_post_type(raw.as_ref()))
    }

    pub async fn mark_skipped(&self, post_id: &str, username: &str) -> StoreResult<()> {
        self.store
            .zadd(&self.keys.post_skipped(post_id), username, now_millis())
            .await
    }

    pub async fn has_skipped(&self, post_id: &str, username: &str) -> StoreResult<bool> {
        let skipped = self
            .store
            .zscore(&self.keys.post_skipped(post_id), username)
            .await?;
        Ok(skipped.is_some())
    }

    pub async fn add_user_post(
        &self,
        username: &str,
        post_id: &str,
        created_at: i64,
    ) -> StoreResult<()> {
        self.store
            .zadd(&self.keys.user_posts(username), post_id, created_at)
            .await
    }

    /// The user's post ids, newest first, between ranks `start` and `stop`.
    pub async fn user_posts(&self, username: &str, start: i64, stop: i64) -> StoreResult<Vec<String>> {
        let entries = self
            .store
            .zrange(&self.keys.user_posts(username), start, stop, RangeOrder::Descending)
            .await?;
        Ok(entries.into_iter().map(|entry| entry.member).collect())
    }

    /// Image lists for many posts at once. Unknown posts yield an empty list.
    pub async fn post_images(&self, post_ids: &[String]) -> StoreResult<Vec<PostImages>> {
        try_join_all(post_ids.iter().map(|post_id| async move {
            let key = self.keys.post_data(post_id);
            let raw = self.store.hget(&key, FIELD_DATA).await?;
            Ok::<_, StoreError>(PostImages {
                post_id: post_id.clone(),
                images: decode_images(&key, raw.as_ref())?,
            })
        }))
        .await
    }

    pub async fn save_pinned_post(&self, post_id: &str) -> StoreResult<()> {
        self.store
            .hset(
                &self.keys.post_data(post_id),
                vec![
                    (FIELD_POST_ID.to_string(), post_id.to_string()),
                    (
                        FIELD_POST_TYPE.to_string(),
                        PostType::Pinned.as_str().to_string(),
                    ),
                ],
            )
            .await
    }

    pub async fn get_pinned_post(&self, post_id: &str) -> StoreResult<PinnedPost> {
        let raw = self
            .store
            .hget(&self.keys.post_data(post_id), FIELD_POST_TYPE)
            .await?;
        let post_type = raw
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(PostType::Pinned);

        Ok(PinnedPost {
            post_id: post_id.to_string(),
            post_type,
        })
    }

    pub async fn save_collection_post(&self, collection: &CollectionPost) -> StoreResult<()> {
        let key = self.keys.post_data(&collection.post_id);
        let entries = encode_json(&key, &collection.entries)?;

        self.store
            .hset(
                &key,
                vec![
                    (FIELD_POST_ID.to_string(), collection.post_id.clone()),
                    (FIELD_DATA.to_string(), entries),
                    (FIELD_TIMEFRAME.to_string(), collection.timeframe.clone()),
                    (
                        FIELD_POST_TYPE.to_string(),
                        PostType::Collection.as_str().to_string(),
                    ),
                ],
            )
            .await
    }

    pub async fn get_collection_post(&self, post_id: &str) -> StoreResult<Option<CollectionPost>> {
        let key = self.keys.post_data(post_id);
        let fields = self.store.hget_all(&key).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        let entries = match fields.get(FIELD_DATA) {
            Some(raw) => serde_json::from_str(raw).map_err(|e| StoreError::Malformed {
                key: key.clone(),
                reason: e.to_string(),
            })?,
            None => Vec::new(),
        };

        Ok(Some(CollectionPost {
            post_id: post_id.to_string(),
            post_type: PostType::Collection,
            entries,
            timeframe: field_or_default(&fields, FIELD_TIMEFRAME),
        }))
    }

    /// Keep only the drawing posts among `post_ids`, in order, up to `limit`.
    pub async fn collect_drawings(
        &self,
        post_ids: &[String],
        limit: usize,
    ) -> StoreResult<Vec<CollectionEntry>> {
        let posts = try_join_all(post_ids.iter().map(|post_id| async move {
            match self.post_type(post_id).await? {
                PostType::Drawing => self.get_post(post_id).await,
                _ => Ok(None),
            }
        }))
        .await?;

        Ok(posts
            .into_iter()
            .flatten()
            .take(limit)
            .map(|post| CollectionEntry {
                post_id: post.post_id,
                author_username: post.author_username,
                images: post.images,
            })
            .collect())
    }
}

fn parse_post_type(raw: Option<&String>) -> PostType {
    match raw.map(|raw| raw.parse::<PostType>()) {
        Some(Ok(post_type)) => post_type,
        Some(Err(e)) => {
            debug!("{}, treating post as a drawing", e);
            PostType::Drawing
        }
        None => PostType::Drawing,
    }
}

fn field_or_default(fields: &HashMap<String, String>, field: &str) -> String {
    fields.get(field).cloned().unwrap_or_default()
}

fn parse_timestamp(key: &str, raw: Option<&String>) -> StoreResult<i64> {
    match raw {
        Some(raw) => raw.parse().map_err(|_| StoreError::Malformed {
            key: key.to_string(),
            reason: format!("invalid timestamp '{}'", raw),
        }),
        None => Ok(0),
    }
}

fn decode_images(key: &str, raw: Option<&String>) -> StoreResult<Vec<String>> {
    match raw {
        Some(raw) => serde_json::from_str(raw).map_err(|e| StoreError::Malformed {
            key: key.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(Vec::new()),
    }
}

fn encode_json<T: serde::Serialize>(key: &str, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|e| StoreError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
