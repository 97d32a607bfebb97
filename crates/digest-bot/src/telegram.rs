//! Minimal Telegram Bot API client.
//!
//! Long-polling `getUpdates`, HTML-mode sends and edits, callback
//! answers and file downloads. The base URLs are injectable so tests
//! can point the client at a mock server.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use digest_dispatch::{Channel, DispatchError, DispatchResult, Keyboard, MessageRef};

pub const LONG_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize, Debug, Clone)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub document: Option<Document>,
    pub voice: Option<Voice>,
    pub audio: Option<Audio>,
    pub photo: Option<Vec<PhotoSize>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Chat {
    pub id: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Document {
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Voice {
    pub file_id: String,
    pub mime_type: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Audio {
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

/// One rendition of a photo; Telegram lists them smallest first.
#[derive(Deserialize, Debug, Clone)]
pub struct PhotoSize {
    pub file_id: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TelegramFile {
    file_path: Option<String>,
}

pub struct TelegramApi {
    client: reqwest::Client,
    api_base: String,
    file_base: String,
}

impl TelegramApi {
    pub fn new(token: &str) -> Self {
        Self::with_base(
            format!("https://api.telegram.org/bot{token}"),
            format!("https://api.telegram.org/file/bot{token}"),
        )
    }

    pub fn with_base(api_base: impl Into<String>, file_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            file_base: file_base.into(),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, payload: Value) -> anyhow::Result<T> {
        let response = self
            .client
            .post(format!("{}/{method}", self.api_base))
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("telegram {method} request failed"))?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .with_context(|| format!("telegram {method} returned malformed JSON"))?;

        if !envelope.ok {
            return Err(anyhow!(
                "telegram {method} rejected: {}",
                envelope.description.unwrap_or_else(|| "no description".into())
            ));
        }
        envelope
            .result
            .ok_or_else(|| anyhow!("telegram {method} returned no result"))
    }

    pub async fn get_updates(&self, offset: i64) -> anyhow::Result<Vec<Update>> {
        self.call(
            "getUpdates",
            json!({
                "offset": offset,
                "timeout": LONG_POLL_TIMEOUT_SECS,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> anyhow::Result<i64> {
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] = keyboard_json(keyboard);
        }
        let message: Message = self.call("sendMessage", payload).await?;
        Ok(message.message_id)
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> anyhow::Result<()> {
        let mut payload = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] = keyboard_json(keyboard);
        }
        self.call::<Value>("editMessageText", payload).await?;
        Ok(())
    }

    pub async fn answer_callback(&self, query_id: &str, text: Option<&str>) -> anyhow::Result<()> {
        let mut payload = json!({ "callback_query_id": query_id });
        if let Some(text) = text {
            payload["text"] = json!(text);
        }
        self.call::<bool>("answerCallbackQuery", payload).await?;
        Ok(())
    }

    pub async fn download_file(&self, file_id: &str) -> anyhow::Result<Vec<u8>> {
        let file: TelegramFile = self.call("getFile", json!({ "file_id": file_id })).await?;
        let path = file
            .file_path
            .ok_or_else(|| anyhow!("telegram getFile returned no path"))?;

        let bytes = self
            .client
            .get(format!("{}/{path}", self.file_base))
            .send()
            .await
            .context("file download request failed")?
            .error_for_status()
            .context("file download rejected")?
            .bytes()
            .await
            .context("file download body read failed")?;
        Ok(bytes.to_vec())
    }
}

fn keyboard_json(keyboard: &Keyboard) -> Value {
    let rows: Vec<Vec<Value>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| json!({ "text": button.label, "callback_data": button.data }))
                .collect()
        })
        .collect();
    json!({ "inline_keyboard": rows })
}

#[async_trait]
impl Channel for TelegramApi {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> DispatchResult<MessageRef> {
        self.send_message(chat_id, text, keyboard)
            .await
            .map(MessageRef)
            .map_err(|error| DispatchError::Channel(error.to_string()))
    }

    async fn edit(
        &self,
        chat_id: i64,
        message: MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> DispatchResult<()> {
        self.edit_message_text(chat_id, message.0, text, keyboard)
            .await
            .map_err(|error| DispatchError::Channel(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use digest_dispatch::{Button, MenuAction};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn send_message_posts_html_with_keyboard() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .and(body_partial_json(json!({
                "chat_id": 7,
                "parse_mode": "HTML",
                "reply_markup": {
                    "inline_keyboard": [[
                        { "text": "⚙️", "callback_data": "menu:main" }
                    ]]
                },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "message_id": 99, "chat": { "id": 7 } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = TelegramApi::with_base(server.uri(), server.uri());
        let keyboard = Keyboard::new().row(vec![Button::new("⚙️", &MenuAction::OpenMain)]);
        let id = api
            .send_message(7, "<b>hi</b>", Some(&keyboard))
            .await
            .expect("send");
        assert_eq!(id, 99);
    }

    #[tokio::test]
    async fn rejected_call_surfaces_the_api_description() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/editMessageText"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": false,
                "description": "message to edit not found"
            })))
            .mount(&server)
            .await;

        let api = TelegramApi::with_base(server.uri(), server.uri());
        let error = api
            .edit_message_text(7, 1, "hi", None)
            .await
            .expect_err("edit should fail");
        assert!(error.to_string().contains("message to edit not found"));
    }

    #[tokio::test]
    async fn get_updates_parses_messages_and_callbacks() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/getUpdates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [
                    {
                        "update_id": 1,
                        "message": {
                            "message_id": 10,
                            "chat": { "id": 7 },
                            "from": { "id": 5 },
                            "text": "/start"
                        }
                    },
                    {
                        "update_id": 2,
                        "callback_query": {
                            "id": "cb1",
                            "from": { "id": 5 },
                            "data": "menu:main"
                        }
                    }
                ]
            })))
            .mount(&server)
            .await;

        let api = TelegramApi::with_base(server.uri(), server.uri());
        let updates = api.get_updates(0).await.expect("updates");
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].message.as_ref().unwrap().text.as_deref(), Some("/start"));
        assert_eq!(
            updates[1].callback_query.as_ref().unwrap().data.as_deref(),
            Some("menu:main")
        );
    }

    #[tokio::test]
    async fn download_resolves_the_path_then_fetches_bytes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/getFile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "file_path": "documents/file_0.txt" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/documents/file_0.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"file body".to_vec()))
            .mount(&server)
            .await;

        let api = TelegramApi::with_base(server.uri(), server.uri());
        let bytes = api.download_file("abc").await.expect("download");
        assert_eq!(bytes, b"file body");
    }
}
