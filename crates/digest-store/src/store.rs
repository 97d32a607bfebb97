//! Storage traits and the SQLite implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use digest_core::settings::{DEFAULT_AUDIO_MODEL, DEFAULT_TEXT_MODEL};
use digest_core::{SettingField, Settings, Turn};

use crate::error::{StoreError, StoreResult};

/// Per-user settings rows. Reads never create a row; writes upsert.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Settings for a user; defaults if no row exists (without
    /// persisting one).
    async fn settings(&self, user_id: i64) -> StoreResult<Settings>;

    /// Atomically insert-or-update a single field for a user.
    async fn update_setting(&self, user_id: i64, field: SettingField, value: &str)
        -> StoreResult<()>;

    /// Overwrite every field with its documented default.
    async fn reset_settings(&self, user_id: i64) -> StoreResult<()>;

    async fn user_exists(&self, user_id: i64) -> StoreResult<bool>;
}

/// Ordered, append-only conversation turn lists keyed by conversation id.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn append_turn(&self, conversation_id: &str, turn: Turn) -> StoreResult<()>;

    /// Turns in the exact order they were appended; empty if absent.
    async fn conversation(&self, conversation_id: &str) -> StoreResult<Vec<Turn>>;

    async fn clear_conversation(&self, conversation_id: &str) -> StoreResult<()>;

    /// Record analysis text on the most recent user turn that carries
    /// an image, so later replays reference it instead of raw bytes.
    async fn set_last_analysis(&self, conversation_id: &str, analysis: &str) -> StoreResult<()>;
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub async fn init(&self) -> StoreResult<()> {
        self.with_connection(|connection| {
            connection.execute_batch(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS user_settings (
                    user_id INTEGER PRIMARY KEY,
                    model TEXT NOT NULL DEFAULT '{text_model}',
                    audio_model TEXT NOT NULL DEFAULT '{audio_model}',
                    summary_language TEXT NOT NULL DEFAULT 'Auto',
                    length TEXT NOT NULL DEFAULT 'Medium',
                    tone TEXT NOT NULL DEFAULT 'Professional',
                    creativity TEXT NOT NULL DEFAULT 'Balanced',
                    ui_language TEXT NOT NULL DEFAULT 'en'
                );

                CREATE TABLE IF NOT EXISTS conversations (
                    conversation_id TEXT PRIMARY KEY,
                    turns TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                "#,
                text_model = DEFAULT_TEXT_MODEL,
                audio_model = DEFAULT_AUDIO_MODEL,
            ))?;
            Ok(())
        })
        .await
    }

    async fn with_connection<T, F>(&self, func: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let connection = open_connection(&db_path)?;
            func(&connection)
        })
        .await
        .map_err(|error| StoreError::Task(error.to_string()))?
    }
}

#[async_trait]
impl SettingsStore for SqliteStore {
    async fn settings(&self, user_id: i64) -> StoreResult<Settings> {
        self.with_connection(move |connection| {
            let row = connection
                .query_row(
                    "SELECT model, audio_model, summary_language, length, tone, creativity, ui_language
                     FROM user_settings WHERE user_id = ?1",
                    params![user_id],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, String>(4)?,
                            row.get::<_, String>(5)?,
                            row.get::<_, String>(6)?,
                        ))
                    },
                )
                .optional()?;

            let Some((model, audio_model, language, length, tone, creativity, ui_language)) = row
            else {
                return Ok(Settings::default());
            };

            let mut settings = Settings::default();
            settings.model = model;
            settings.audio_model = audio_model;
            settings.set_value(SettingField::SummaryLanguage, &language);
            settings.set_value(SettingField::Length, &length);
            settings.set_value(SettingField::Tone, &tone);
            settings.set_value(SettingField::Creativity, &creativity);
            settings.set_value(SettingField::UiLanguage, &ui_language);
            Ok(settings)
        })
        .await
    }

    async fn update_setting(
        &self,
        user_id: i64,
        field: SettingField,
        value: &str,
    ) -> StoreResult<()> {
        // Normalize through the enum parser so only catalog values are
        // ever stored.
        let mut scratch = Settings::default();
        scratch.set_value(field, value);
        let canonical = scratch.value(field);

        self.with_connection(move |connection| {
            // Column names come from SettingField::column, a closed set
            // of static strings, so interpolation here is not an
            // injection surface.
            let sql = format!(
                "INSERT INTO user_settings (user_id, {column}) VALUES (?1, ?2)
                 ON CONFLICT(user_id) DO UPDATE SET {column} = excluded.{column}",
                column = field.column(),
            );
            connection.execute(&sql, params![user_id, canonical])?;
            Ok(())
        })
        .await
    }

    async fn reset_settings(&self, user_id: i64) -> StoreResult<()> {
        let defaults = Settings::default();
        self.with_connection(move |connection| {
            connection.execute(
                r#"
                INSERT INTO user_settings (
                    user_id, model, audio_model, summary_language, length, tone, creativity, ui_language
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(user_id) DO UPDATE SET
                    model = excluded.model,
                    audio_model = excluded.audio_model,
                    summary_language = excluded.summary_language,
                    length = excluded.length,
                    tone = excluded.tone,
                    creativity = excluded.creativity,
                    ui_language = excluded.ui_language
                "#,
                params![
                    user_id,
                    defaults.model,
                    defaults.audio_model,
                    defaults.summary_language.as_str(),
                    defaults.length.as_str(),
                    defaults.tone.as_str(),
                    defaults.creativity.as_str(),
                    defaults.ui_language.as_str(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn user_exists(&self, user_id: i64) -> StoreResult<bool> {
        self.with_connection(move |connection| {
            let found = connection
                .query_row(
                    "SELECT 1 FROM user_settings WHERE user_id = ?1",
                    params![user_id],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }
}

#[async_trait]
impl ConversationStore for SqliteStore {
    async fn append_turn(&self, conversation_id: &str, turn: Turn) -> StoreResult<()> {
        let conversation_id = conversation_id.to_string();
        self.with_connection(move |connection| {
            let mut turns = load_turns(connection, &conversation_id)?;
            turns.push(turn);
            save_turns(connection, &conversation_id, &turns)
        })
        .await
    }

    async fn conversation(&self, conversation_id: &str) -> StoreResult<Vec<Turn>> {
        let conversation_id = conversation_id.to_string();
        self.with_connection(move |connection| load_turns(connection, &conversation_id))
            .await
    }

    async fn clear_conversation(&self, conversation_id: &str) -> StoreResult<()> {
        let conversation_id = conversation_id.to_string();
        self.with_connection(move |connection| {
            let now = Utc::now().to_rfc3339();
            connection.execute(
                "UPDATE conversations SET turns = '[]', updated_at = ?1 WHERE conversation_id = ?2",
                params![now, conversation_id],
            )?;
            Ok(())
        })
        .await
    }

    async fn set_last_analysis(&self, conversation_id: &str, analysis: &str) -> StoreResult<()> {
        let conversation_id = conversation_id.to_string();
        let analysis = analysis.to_string();
        self.with_connection(move |connection| {
            let mut turns = load_turns(connection, &conversation_id)?;
            if let Some(turn) = turns
                .iter_mut()
                .rev()
                .find(|turn| turn.content.has_image())
            {
                turn.analysis = Some(analysis);
                save_turns(connection, &conversation_id, &turns)?;
            }
            Ok(())
        })
        .await
    }
}

fn open_connection(path: &Path) -> StoreResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let connection = Connection::open(path)?;
    connection.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        "#,
    )?;
    Ok(connection)
}

fn load_turns(connection: &Connection, conversation_id: &str) -> StoreResult<Vec<Turn>> {
    let raw = connection
        .query_row(
            "SELECT turns FROM conversations WHERE conversation_id = ?1",
            params![conversation_id],
            |row| row.get::<_, String>(0),
        )
        .optional()?;

    match raw {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

fn save_turns(connection: &Connection, conversation_id: &str, turns: &[Turn]) -> StoreResult<()> {
    let json = serde_json::to_string(turns)?;
    let now = Utc::now().to_rfc3339();
    connection.execute(
        r#"
        INSERT INTO conversations (conversation_id, turns, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?3)
        ON CONFLICT(conversation_id) DO UPDATE SET
            turns = excluded.turns,
            updated_at = excluded.updated_at
        "#,
        params![conversation_id, json, now],
    )?;
    Ok(())
}
