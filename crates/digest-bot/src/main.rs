//! Bot entrypoint: configuration, storage init, long-poll loop.

mod handlers;
mod telegram;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use digest_core::Config;
use digest_llm::{Completer, ContentCache, ModelCatalog, OpenAiCompatProvider};
use digest_store::{SessionStore, SqliteStore};

use crate::handlers::App;
use crate::telegram::TelegramApi;

const COMPLETION_CACHE_TTL: Duration = Duration::from_secs(3600);
const COMPLETION_CACHE_CAPACITY: usize = 256;
// Image analyses are dearer than text completions, so they stay longer.
const ANALYSIS_CACHE_TTL: Duration = Duration::from_secs(6 * 3600);
const ANALYSIS_CACHE_CAPACITY: usize = 128;
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::from_env();
    let bot_token = config
        .bot_token
        .clone()
        .context("TELEGRAM_BOT_TOKEN is not set")?;
    let api_key = config.api_key.clone().context("LLM_API_KEY is not set")?;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("cannot create upload dir {}", config.upload_dir.display()))?;

    let store = SqliteStore::new(&config.db_path);
    store.init().await.context("database init failed")?;

    let provider = Arc::new(OpenAiCompatProvider::with_timeout(
        api_key,
        config.api_base.clone(),
        Duration::from_secs(config.request_timeout_secs),
    ));
    let completer = Completer::new(
        provider.clone(),
        Arc::new(ContentCache::new(
            COMPLETION_CACHE_TTL,
            COMPLETION_CACHE_CAPACITY,
        )),
    );
    let catalog = ModelCatalog::new(provider.clone());
    let analysis_cache = Arc::new(ContentCache::new(
        ANALYSIS_CACHE_TTL,
        ANALYSIS_CACHE_CAPACITY,
    ));

    let app = Arc::new(App::new(
        TelegramApi::new(&bot_token),
        SessionStore::new(store),
        completer,
        catalog,
        provider,
        analysis_cache,
        config.upload_dir.clone(),
    ));

    log::info!(
        "digest bot started (db: {}, api: {})",
        config.db_path.display(),
        config.api_base
    );

    let mut offset = 0i64;
    loop {
        match app.api.get_updates(offset).await {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    let app = Arc::clone(&app);
                    tokio::spawn(async move { app.handle_update(update).await });
                }
            }
            Err(error) => {
                log::error!("update poll failed: {error}");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
            }
        }
    }
}
