//! Inference client layer.
//!
//! One blocking/awaited call per request against an OpenAI-compatible
//! chat-completions API, with a user-safe fallback at the boundary, a
//! TTL model catalog and a process-scoped content-hash cache.

mod cache;
mod catalog;
mod completer;
mod error;
mod openai_compat;
mod provider;

pub use cache::{Clock, ContentCache, SystemClock};
pub use catalog::{Catalog, ModelCatalog};
pub use completer::Completer;
pub use error::{LlmError, LlmResult};
pub use openai_compat::OpenAiCompatProvider;
pub use provider::{
    CompletionProvider, CompletionRequest, TranscriptionProvider, TranscriptionRequest,
};
