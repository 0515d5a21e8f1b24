/// Maps entity identifiers to store keys.
///
/// Every key is namespaced so several games can share one store. The layout
/// is plain data; components receive a copy at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    namespace: String,
    scoreboard_tag: String,
}

impl KeyLayout {
    pub fn new(namespace: impl Into<String>, scoreboard_tag: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            scoreboard_tag: scoreboard_tag.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Sorted set: guess text -> times guessed.
    pub fn post_guesses(&self, post_id: &str) -> String {
        format!("guesses-{}:{}", self.namespace, post_id)
    }

    /// Sorted set: username -> guesses made on the post.
    pub fn user_guess_counter(&self, post_id: &str) -> String {
        format!("user-guess-counter-{}:{}", self.namespace, post_id)
    }

    /// Sorted set: username -> solve time.
    pub fn post_solved(&self, post_id: &str) -> String {
        format!("solved-{}:{}", self.namespace, post_id)
    }

    /// Sorted set: username -> skip time.
    pub fn post_skipped(&self, post_id: &str) -> String {
        format!("skipped-{}:{}", self.namespace, post_id)
    }

    /// Hash holding the post record.
    pub fn post_data(&self, post_id: &str) -> String {
        format!("post-{}:{}", self.namespace, post_id)
    }

    /// Sorted set: username -> cumulative points.
    pub fn scoreboard(&self) -> String {
        format!("pixels-{}:{}-{}", self.namespace, self.scoreboard_tag, self.namespace)
    }

    pub fn submission_lock(&self, username: &str) -> String {
        format!("locked-{}:{}", self.namespace, username)
    }

    /// Hash: platform user id -> username.
    pub fn username_cache(&self) -> String {
        format!("cache:userId-username-{}", self.namespace)
    }

    /// Sorted set: post id -> creation time.
    pub fn user_posts(&self, username: &str) -> String {
        format!("user-images-{}:{}", self.namespace, username)
    }

    pub fn game_settings(&self) -> String {
        format!("game-settings-{}", self.namespace)
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::new("pdg", "default")
    }
}
