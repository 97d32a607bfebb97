//! Model catalog with TTL caching.
//!
//! The live model list is fetched at most once per TTL window and
//! split into text and audio groups; any fetch failure falls back to
//! the static catalog so the settings menu always has something to
//! show.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use digest_core::settings::{fallback_audio_models, fallback_text_models};
use digest_core::{ModelInfo, ModelKind};

use crate::cache::{Clock, SystemClock};
use crate::provider::CompletionProvider;

pub const CATALOG_TTL: Duration = Duration::from_secs(3600);

/// Text and audio model lists as shown in the picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    pub text: Vec<ModelInfo>,
    pub audio: Vec<ModelInfo>,
}

impl Catalog {
    pub fn fallback() -> Self {
        Self {
            text: fallback_text_models(),
            audio: fallback_audio_models(),
        }
    }

    pub fn models(&self, kind: ModelKind) -> &[ModelInfo] {
        match kind {
            ModelKind::Text => &self.text,
            ModelKind::Audio => &self.audio,
        }
    }

    /// Display label for a model id, with a prettified fallback for
    /// ids that are no longer in the catalog.
    pub fn label_for(&self, kind: ModelKind, model_id: &str) -> String {
        self.models(kind)
            .iter()
            .find(|model| model.id == model_id)
            .map(|model| model.label.clone())
            .unwrap_or_else(|| prettify_model_id(model_id))
    }
}

pub struct ModelCatalog<P> {
    provider: Arc<P>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    cached: RwLock<Option<(Instant, Catalog)>>,
}

impl<P: CompletionProvider> ModelCatalog<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_clock(provider, CATALOG_TTL, Arc::new(SystemClock))
    }

    pub fn with_clock(provider: Arc<P>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            ttl,
            clock,
            cached: RwLock::new(None),
        }
    }

    /// Current catalog: cached within the TTL window, refetched after,
    /// static fallback when the provider cannot be reached.
    pub async fn catalog(&self) -> Catalog {
        let now = self.clock.now();

        if let Some((fetched_at, catalog)) = self.cached.read().await.as_ref() {
            if now.duration_since(*fetched_at) < self.ttl {
                return catalog.clone();
            }
        }

        match self.provider.list_models().await {
            Ok(ids) if !ids.is_empty() => {
                let catalog = classify_models(ids);
                *self.cached.write().await = Some((now, catalog.clone()));
                catalog
            }
            Ok(_) => Catalog::fallback(),
            Err(error) => {
                log::error!("model list fetch failed: {error}");
                Catalog::fallback()
            }
        }
    }
}

/// Split raw model ids into text/audio groups, dropping guard models,
/// sorted by display label.
fn classify_models(ids: Vec<String>) -> Catalog {
    let mut text = Vec::new();
    let mut audio = Vec::new();

    for id in ids {
        let lower = id.to_lowercase();
        if lower.contains("guard") {
            continue;
        }
        let entry = ModelInfo::new(prettify_model_id(&id), id);
        if lower.contains("whisper") {
            audio.push(entry);
        } else {
            text.push(entry);
        }
    }

    text.sort_by(|a, b| a.label.cmp(&b.label));
    audio.sort_by(|a, b| a.label.cmp(&b.label));

    if text.is_empty() && audio.is_empty() {
        return Catalog::fallback();
    }
    Catalog { text, audio }
}

fn prettify_model_id(id: &str) -> String {
    if id.contains("llama-3.3") {
        return "Llama 3.3 (Latest)".to_string();
    }
    if id.contains("llama-3.1") {
        return "Llama 3.1".to_string();
    }
    if id.contains("mixtral") {
        return "Mixtral 8x7B".to_string();
    }
    if id.contains("gemma2") {
        return "Gemma 2".to_string();
    }
    if id.contains("deepseek") {
        return "DeepSeek R1".to_string();
    }
    if id.contains("qwen") {
        return "Qwen 2.5".to_string();
    }

    id.split(['-', '/'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
