//! Outbound delivery.
//!
//! [`Channel`] is the seam between formatting and the concrete chat
//! transport; [`deliver`] owns the ordering rules for multi-part
//! responses so transports stay dumb.

use async_trait::async_trait;
use thiserror::Error;

use crate::chunk::split_message;
use crate::keyboard::Keyboard;
use crate::sanitize::sanitize_html;

/// Hard per-message character limit enforced before dispatch.
pub const MESSAGE_LIMIT: usize = 4000;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("channel error: {0}")]
    Channel(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Channel-native id of a sent message, used for later edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageRef(pub i64);

#[async_trait]
pub trait Channel: Send + Sync {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> DispatchResult<MessageRef>;

    async fn edit(
        &self,
        chat_id: i64,
        message: MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> DispatchResult<()>;
}

/// Sanitize, split and send a response.
///
/// The first part replaces `placeholder` in place when one exists
/// (falling back to a fresh send if the edit is rejected); follow-up
/// parts go out strictly in order, and `controls` are attached to the
/// final part only.
pub async fn deliver<C: Channel + ?Sized>(
    channel: &C,
    chat_id: i64,
    placeholder: Option<MessageRef>,
    text: &str,
    controls: Option<&Keyboard>,
) -> DispatchResult<()> {
    let clean = sanitize_html(text);
    let parts = split_message(&clean, MESSAGE_LIMIT);
    let last = parts.len() - 1;

    for (index, part) in parts.iter().enumerate() {
        let keyboard = if index == last { controls } else { None };

        if index == 0 {
            if let Some(message) = placeholder {
                // Edits fail on deleted or too-old placeholders; a
                // fresh send keeps the response flowing.
                if let Err(error) = channel.edit(chat_id, message, part, keyboard).await {
                    log::warn!("placeholder edit failed, sending fresh: {error}");
                    channel.send(chat_id, part, keyboard).await?;
                }
                continue;
            }
        }
        channel.send(chat_id, part, keyboard).await?;
    }

    Ok(())
}
