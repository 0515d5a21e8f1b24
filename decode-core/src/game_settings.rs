use decode_persistence::{KeyValueStore, StoreResult};
use decode_types::GameSettings;
use std::sync::Arc;

use crate::keys::KeyLayout;

const FIELD_SUBREDDIT_NAME: &str = "subredditName";
const FIELD_SELECTED_DICTIONARY: &str = "selectedDictionary";

#[derive(Clone)]
pub struct GameSettingsStore {
    store: Arc<dyn KeyValueStore>,
    keys: KeyLayout,
}

impl GameSettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: KeyLayout) -> Self {
        Self { store, keys }
    }

    pub async fn store(&self, settings: &GameSettings) -> StoreResult<()> {
        self.store
            .hset(
                &self.keys.game_settings(),
                vec![
                    (
                        FIELD_SUBREDDIT_NAME.to_string(),
                        settings.subreddit_name.clone(),
                    ),
                    (
                        FIELD_SELECTED_DICTIONARY.to_string(),
                        settings.selected_dictionary.clone(),
                    ),
                ],
            )
            .await
    }

    /// Missing fields read as empty strings.
    pub async fn load(&self) -> StoreResult<GameSettings> {
        let mut fields = self.store.hget_all(&self.keys.game_settings()).await?;
        Ok(GameSettings {
            subreddit_name: fields.remove(FIELD_SUBREDDIT_NAME).unwrap_or_default(),
            selected_dictionary: fields
                .remove(FIELD_SELECTED_DICTIONARY)
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decode_persistence::MemoryStore;

    #[tokio::test]
    async fn test_settings_round_trip() {
        let settings_store =
            GameSettingsStore::new(Arc::new(MemoryStore::new()), KeyLayout::default());

        assert_eq!(settings_store.load().await.unwrap(), GameSettings::default());

        let settings = GameSettings {
            subreddit_name: "photodecode".to_string(),
            selected_dictionary: "main".to_string(),
        };
        settings_store.store(&settings).await.unwrap();
        assert_eq!(settings_store.load().await.unwrap(), settings);
    }
}
