//! Degrading storage facade.
//!
//! The interactive flow must survive storage faults: callers get
//! defaults/empty results while the underlying error is logged with
//! detail server-side.

use digest_core::{SettingField, Settings, Turn};

use crate::store::{ConversationStore, SettingsStore};

#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    inner: S,
}

impl<S> SessionStore<S>
where
    S: SettingsStore + ConversationStore,
{
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub async fn settings(&self, user_id: i64) -> Settings {
        match self.inner.settings(user_id).await {
            Ok(settings) => settings,
            Err(error) => {
                log::error!("settings read failed for user {user_id}: {error}");
                Settings::default()
            }
        }
    }

    pub async fn update_setting(&self, user_id: i64, field: SettingField, value: &str) {
        if let Err(error) = self.inner.update_setting(user_id, field, value).await {
            log::error!(
                "setting update failed for user {user_id} ({}): {error}",
                field.column()
            );
        }
    }

    pub async fn reset_settings(&self, user_id: i64) {
        if let Err(error) = self.inner.reset_settings(user_id).await {
            log::error!("settings reset failed for user {user_id}: {error}");
        }
    }

    pub async fn user_exists(&self, user_id: i64) -> bool {
        match self.inner.user_exists(user_id).await {
            Ok(exists) => exists,
            Err(error) => {
                log::error!("existence check failed for user {user_id}: {error}");
                false
            }
        }
    }

    pub async fn append_turn(&self, conversation_id: &str, turn: Turn) {
        if let Err(error) = self.inner.append_turn(conversation_id, turn).await {
            log::error!("turn append failed for conversation {conversation_id}: {error}");
        }
    }

    pub async fn conversation(&self, conversation_id: &str) -> Vec<Turn> {
        match self.inner.conversation(conversation_id).await {
            Ok(turns) => turns,
            Err(error) => {
                log::error!("conversation load failed for {conversation_id}: {error}");
                Vec::new()
            }
        }
    }

    pub async fn clear_conversation(&self, conversation_id: &str) {
        if let Err(error) = self.inner.clear_conversation(conversation_id).await {
            log::error!("conversation clear failed for {conversation_id}: {error}");
        }
    }

    pub async fn set_last_analysis(&self, conversation_id: &str, analysis: &str) {
        if let Err(error) = self.inner.set_last_analysis(conversation_id, analysis).await {
            log::error!("analysis annotate failed for {conversation_id}: {error}");
        }
    }
}
