//! OpenAI-compatible provider (OpenRouter, Groq, OpenAI).
//!
//! HTTPS POST with bearer auth, JSON body `{model, messages,
//! temperature, max_tokens}`, response read from
//! `choices[0].message.content`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use digest_core::{ContentPart, Turn};

use crate::error::{LlmError, LlmResult};
use crate::provider::{
    CompletionProvider, CompletionRequest, TranscriptionProvider, TranscriptionRequest,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

pub struct OpenAiCompatProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiCompatProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_timeout(api_key, base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn build_request_body(&self, request: &CompletionRequest) -> Value {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(json!({
            "role": "system",
            "content": request.system,
        }));
        for turn in &request.messages {
            messages.push(turn_to_json(turn));
        }

        json!({
            "model": request.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }
}

/// Convert a [`Turn`] to the wire message shape. A single text part is
/// sent as a plain string; anything multi-modal becomes a parts array.
fn turn_to_json(turn: &Turn) -> Value {
    let role = turn.role.as_str();

    match turn.content.parts.as_slice() {
        [ContentPart::Text { text }] => json!({ "role": role, "content": text }),
        parts => {
            let wire_parts: Vec<Value> = parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => json!({ "type": "text", "text": text }),
                    ContentPart::Image { data, media_type } => json!({
                        "type": "image_url",
                        "image_url": { "url": format!("data:{media_type};base64,{data}") },
                    }),
                })
                .collect();
            json!({ "role": role, "content": wire_parts })
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String> {
        let body = self.build_request_body(request);
        log::debug!(
            "completion request: model={} messages={}",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {status}: {text}")));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)
    }

    async fn list_models(&self) -> LlmResult<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(LlmError::Api(format!("HTTP {status} listing models")));
        }

        let listing: ModelListResponse = response.json().await?;
        Ok(listing.data.into_iter().map(|model| model.id).collect())
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAiCompatProvider {
    async fn transcribe(&self, request: &TranscriptionRequest) -> LlmResult<String> {
        let part = reqwest::multipart::Part::bytes(request.bytes.clone())
            .file_name(request.file_name.clone());
        let form = reqwest::multipart::Form::new()
            .text("model", request.model.clone())
            .text("response_format", "json")
            .part("file", part);

        log::debug!(
            "transcription request: model={} file={}",
            request.model,
            request.file_name
        );

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {status}: {text}")));
        }

        let transcription: TranscriptionResponse = response.json().await?;
        if transcription.text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(transcription.text)
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}
