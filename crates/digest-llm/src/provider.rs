//! Provider seam for hosted completion APIs.

use async_trait::async_trait;
use serde::Serialize;

use digest_core::{Prompt, Turn};

use crate::error::LlmResult;

/// One fully-specified completion call.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub messages: Vec<Turn>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn from_prompt(prompt: Prompt, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            system: prompt.system,
            messages: prompt.messages,
            temperature,
            max_tokens: digest_core::prompt::MAX_COMPLETION_TOKENS,
        }
    }
}

/// One audio transcription call.
#[derive(Clone, Debug)]
pub struct TranscriptionRequest {
    pub model: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issue one request/response completion call.
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String>;

    /// List model ids offered by the provider.
    async fn list_models(&self) -> LlmResult<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Speech-to-text seam, kept separate from completions so callers can
/// depend on exactly the capability they use.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(&self, request: &TranscriptionRequest) -> LlmResult<String>;
}
