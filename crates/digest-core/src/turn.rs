//! Conversation turn types.
//!
//! A conversation is an append-only sequence of turns. Turn order is
//! preserved verbatim when replayed to the inference API.

use serde::{Deserialize, Serialize};

/// Who produced a turn. Wire names match the chat-completions API.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A part of turn content (text or an encoded image).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content
    Text { text: String },

    /// Base64 encoded image data
    Image { data: String, media_type: String },
}

impl ContentPart {
    /// Create a text content part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an image content part from base64 data
    pub fn image_base64(data: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self::Image {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    /// Get text content if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// Container for the content parts of a single turn.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TurnContent {
    pub parts: Vec<ContentPart>,
}

impl TurnContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content with a single text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![ContentPart::text(text)],
        }
    }

    pub fn push(&mut self, part: ContentPart) {
        self.parts.push(part);
    }

    /// All text content concatenated
    pub fn as_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn has_image(&self) -> bool {
        self.parts.iter().any(|p| p.is_image())
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<String> for TurnContent {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<&str> for TurnContent {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

/// One message in a conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: TurnContent,

    /// Cached analysis text for an image turn, recorded after the
    /// vision call. Replayed in place of the raw image on later turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<TurnContent>) -> Self {
        Self {
            role,
            content: content.into(),
            analysis: None,
        }
    }

    pub fn user(content: impl Into<TurnContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<TurnContent>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
