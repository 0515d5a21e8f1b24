use decode_persistence::KeyValueStore;
use decode_types::{
    CollectionPost, GameSettings, GuessOutcome, NewPost, PostImages, PostResults, PostType,
    PostView, SafePostRecord, ScoreBoardEntry, SubmitPostOutcome, UserPostState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::content::ContentApi;
use crate::errors::ServiceError;
use crate::game_settings::GameSettingsStore;
use crate::guess_ledger::{FIRST_SOLVER_COMMENT_DELAY, GuessLedger};
use crate::keys::KeyLayout;
use crate::post_store::PostStore;
use crate::scheduler::Scheduler;
use crate::score_board::ScoreBoard;
use crate::scoring::RewardSettings;
use crate::submission_gate::{DEFAULT_SUBMISSION_LOCK, SubmissionGate};
use crate::username_cache::UsernameCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    pub rewards: RewardSettings,
    pub submission_lock: Duration,
    pub first_solver_comment_delay: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            rewards: RewardSettings::default(),
            submission_lock: DEFAULT_SUBMISSION_LOCK,
            first_solver_comment_delay: FIRST_SOLVER_COMMENT_DELAY,
        }
    }
}

/// Entry point for everything a client can do.
///
/// Writes propagate store failures. The read paths a client polls for
/// scores and results log failures and fall back to empty values instead.
pub struct GameService {
    score_board: ScoreBoard,
    ledger: GuessLedger,
    gate: SubmissionGate,
    posts: PostStore,
    settings: GameSettingsStore,
    usernames: UsernameCache,
    rewards: RewardSettings,
}

impl GameService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        keys: KeyLayout,
        scheduler: Arc<dyn Scheduler>,
        settings: ServiceSettings,
    ) -> Self {
        let score_board = ScoreBoard::new(store.clone(), keys.clone());
        let ledger = GuessLedger::new(
            store.clone(),
            keys.clone(),
            score_board.clone(),
            scheduler,
            settings.rewards,
        )
        .with_acknowledgment_delay(settings.first_solver_comment_delay);

        Self {
            score_board,
            ledger,
            gate: SubmissionGate::new(store.clone(), keys.clone(), settings.submission_lock),
            posts: PostStore::new(store.clone(), keys.clone()),
            settings: GameSettingsStore::new(store.clone(), keys.clone()),
            usernames: UsernameCache::new(store, keys),
            rewards: settings.rewards,
        }
    }

    pub fn score_board(&self) -> &ScoreBoard {
        &self.score_board
    }

    pub fn ledger(&self) -> &GuessLedger {
        &self.ledger
    }

    pub fn posts(&self) -> &PostStore {
        &self.posts
    }

    pub async fn submit_guess(
        &self,
        post_id: &str,
        username: &str,
        guess: &str,
    ) -> Result<GuessOutcome, ServiceError> {
        if guess.trim().is_empty() {
            return Err(ServiceError::EmptyGuess);
        }

        let not_found = || ServiceError::PostNotFound {
            post_id: post_id.to_string(),
        };

        // Pinned and collection posts keep a different payload under the same hash
        if self.posts.post_type(post_id).await? != PostType::Drawing {
            return Err(not_found());
        }

        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(not_found)?;

        Ok(self.ledger.record_guess(&post, username, guess).await?)
    }

    pub async fn submit_post(&self, new_post: NewPost) -> Result<SubmitPostOutcome, ServiceError> {
        if new_post.word.trim().is_empty() {
            return Err(ServiceError::InvalidPost("word must not be empty".to_string()));
        }
        if new_post.images.is_empty() {
            return Err(ServiceError::InvalidPost(
                "at least one image is required".to_string(),
            ));
        }

        if !self.gate.try_acquire(&new_post.author_username).await? {
            return Ok(SubmitPostOutcome::Debounced);
        }

        let created_at = self.posts.create_post(&new_post).await?;
        self.posts
            .add_user_post(&new_post.author_username, &new_post.post_id, created_at)
            .await?;
        self.score_board
            .increment(
                &new_post.author_username,
                self.rewards.author_reward_for_submit,
            )
            .await?;

        info!(
            "{} created post {} with {} images",
            new_post.author_username,
            new_post.post_id,
            new_post.images.len()
        );

        Ok(SubmitPostOutcome::Created {
            post_id: new_post.post_id,
        })
    }

    pub async fn skip_post(&self, post_id: &str, username: &str) -> Result<(), ServiceError> {
        self.posts.mark_skipped(post_id, username).await?;
        Ok(())
    }

    /// What to render for a post, chosen by its stored type.
    pub async fn post_view(&self, post_id: &str) -> Result<Option<PostView>, ServiceError> {
        let view = match self.posts.post_type(post_id).await? {
            PostType::Drawing => self
                .posts
                .get_post(post_id)
                .await?
                .map(|post| PostView::Drawing(SafePostRecord::from(&post))),
            PostType::Pinned => Some(PostView::Pinned(
                self.posts.get_pinned_post(post_id).await?,
            )),
            PostType::Collection => self
                .posts
                .get_collection_post(post_id)
                .await?
                .map(PostView::Collection),
        };
        Ok(view)
    }

    pub async fn user_state(
        &self,
        post_id: &str,
        username: &str,
    ) -> Result<UserPostState, ServiceError> {
        Ok(UserPostState {
            score: self.user_score(username).await,
            solved: self.ledger.has_solved(post_id, username).await?,
            skipped: self.posts.has_skipped(post_id, username).await?,
            guess_count: self.ledger.user_guess_count(post_id, username).await?,
        })
    }

    pub async fn user_score(&self, username: &str) -> i64 {
        match self.score_board.score(username).await {
            Ok(score) => score,
            Err(e) => {
                warn!("Error fetching score for {}: {}", username, e);
                0
            }
        }
    }

    pub async fn leaderboard(&self, limit: usize) -> Vec<ScoreBoardEntry> {
        match self.score_board.top(limit).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error fetching leaderboard: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn results(&self, post_id: &str) -> PostResults {
        let results = async {
            Ok::<_, ServiceError>(PostResults {
                player_count: self.ledger.player_count(post_id).await?,
                guesses: self.ledger.post_guesses(post_id).await?,
            })
        };

        match results.await {
            Ok(results) => results,
            Err(e) => {
                warn!("Error loading results for {}: {}", post_id, e);
                PostResults::default()
            }
        }
    }

    /// The user's posts with their images, newest first.
    pub async fn user_posts(&self, username: &str, limit: usize) -> Vec<PostImages> {
        if limit == 0 {
            return Vec::new();
        }

        let posts = async {
            let post_ids = self
                .posts
                .user_posts(username, 0, i64::try_from(limit).unwrap_or(i64::MAX) - 1)
                .await?;
            Ok::<_, ServiceError>(self.posts.post_images(&post_ids).await?)
        };

        match posts.await {
            Ok(posts) => posts,
            Err(e) => {
                warn!("Error fetching posts by {}: {}", username, e);
                Vec::new()
            }
        }
    }

    /// Set up a community: record the pinned landing post and game settings.
    pub async fn install(
        &self,
        pinned_post_id: &str,
        settings: &GameSettings,
    ) -> Result<(), ServiceError> {
        self.posts.save_pinned_post(pinned_post_id).await?;
        self.settings.store(settings).await?;
        info!(
            "Installed game in r/{} with pinned post {}",
            settings.subreddit_name, pinned_post_id
        );
        Ok(())
    }

    pub async fn game_settings(&self) -> Result<GameSettings, ServiceError> {
        Ok(self.settings.load().await?)
    }

    /// Gather drawing posts from `candidates` into a collection post.
    pub async fn publish_collection(
        &self,
        post_id: &str,
        candidates: &[String],
        limit: usize,
        timeframe: &str,
    ) -> Result<CollectionPost, ServiceError> {
        let entries = self.posts.collect_drawings(candidates, limit).await?;
        let collection = CollectionPost {
            post_id: post_id.to_string(),
            post_type: PostType::Collection,
            entries,
            timeframe: timeframe.to_string(),
        };

        self.posts.save_collection_post(&collection).await?;
        info!(
            "Published collection {} with {} drawings",
            post_id,
            collection.entries.len()
        );
        Ok(collection)
    }

    pub async fn resolve_username(
        &self,
        user_id: &str,
        content: &dyn ContentApi,
    ) -> Result<Option<String>, ServiceError> {
        self.usernames.resolve(user_id, content).await
    }
}
