//! Fallback boundary over a completion provider.
//!
//! Transport and API failures never cross this boundary: the caller
//! always receives text it can show the user. Successful completions
//! are cached by a hash of the full request so identical inputs within
//! the cache window do not trigger a second billable call.

use std::sync::Arc;

use digest_core::{tr, MsgKey, UiLanguage};

use crate::cache::ContentCache;
use crate::provider::{CompletionProvider, CompletionRequest};

pub struct Completer<P> {
    provider: Arc<P>,
    cache: Arc<ContentCache>,
}

impl<P: CompletionProvider> Completer<P> {
    pub fn new(provider: Arc<P>, cache: Arc<ContentCache>) -> Self {
        Self { provider, cache }
    }

    /// Complete, returning the localized user-safe fallback string on
    /// any failure. No automatic retry.
    pub async fn complete_or_fallback(
        &self,
        request: &CompletionRequest,
        lang: UiLanguage,
    ) -> String {
        let key = serde_json::to_vec(request)
            .ok()
            .map(|bytes| ContentCache::key_for(&bytes));

        if let Some(key) = &key {
            if let Some(hit) = self.cache.get(key) {
                log::debug!("completion cache hit for model {}", request.model);
                return hit;
            }
        }

        match self.provider.complete(request).await {
            Ok(text) => {
                if let Some(key) = key {
                    self.cache.insert(key, text.clone());
                }
                text
            }
            Err(error) => {
                log::error!("completion failed for model {}: {error}", request.model);
                tr(lang, MsgKey::ErrorApi).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::{LlmError, LlmResult};

    use super::*;

    struct ScriptedProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, _request: &CompletionRequest) -> LlmResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LlmError::Api("HTTP 429: rate limited".to_string()))
            } else {
                Ok("a fine summary".to_string())
            }
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "llama-3.3-70b-versatile".to_string(),
            system: "summarize".to_string(),
            messages: vec![digest_core::Turn::user("hello world")],
            temperature: 0.5,
            max_tokens: 2048,
        }
    }

    fn cache() -> Arc<ContentCache> {
        Arc::new(ContentCache::new(Duration::from_secs(3600), 64))
    }

    #[tokio::test]
    async fn api_failure_maps_to_localized_fallback() {
        let provider = Arc::new(ScriptedProvider {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let completer = Completer::new(provider, cache());

        let text = completer
            .complete_or_fallback(&request(), UiLanguage::En)
            .await;
        assert_eq!(text, tr(UiLanguage::En, MsgKey::ErrorApi));

        let text_fa = completer
            .complete_or_fallback(&request(), UiLanguage::Fa)
            .await;
        assert_eq!(text_fa, tr(UiLanguage::Fa, MsgKey::ErrorApi));
    }

    #[tokio::test]
    async fn identical_requests_hit_the_cache() {
        let provider = Arc::new(ScriptedProvider {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let completer = Completer::new(provider.clone(), cache());

        let first = completer
            .complete_or_fallback(&request(), UiLanguage::En)
            .await;
        let second = completer
            .complete_or_fallback(&request(), UiLanguage::En)
            .await;

        assert_eq!(first, "a fine summary");
        assert_eq!(second, "a fine summary");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let provider = Arc::new(ScriptedProvider {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let completer = Completer::new(provider.clone(), cache());

        completer
            .complete_or_fallback(&request(), UiLanguage::En)
            .await;
        completer
            .complete_or_fallback(&request(), UiLanguage::En)
            .await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }
}
