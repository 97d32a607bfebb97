//! Runtime configuration.
//!
//! Credentials and paths come from the environment only; the codebase
//! carries no token or key literals.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Telegram bot token. Required to run the bot binary.
    pub bot_token: Option<String>,
    /// Bearer token for the completion API. Required to run the bot.
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible completion API.
    pub api_base: String,
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
    /// Directory for received uploads.
    pub upload_dir: PathBuf,
    /// Per-request timeout for inference calls, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            db_path: PathBuf::from("digest.db"),
            upload_dir: PathBuf::from("uploads"),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            config.bot_token = Some(token);
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.api_key = Some(key);
        }
        if let Ok(base) = std::env::var("LLM_API_BASE") {
            config.api_base = base;
        }
        if let Ok(path) = std::env::var("DIGEST_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("DIGEST_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Ok(timeout) = std::env::var("DIGEST_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.trim().parse::<u64>() {
                config.request_timeout_secs = secs;
            }
        }

        config
    }
}
