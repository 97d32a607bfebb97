//! Response formatting and dispatch.
//!
//! Sanitizes model output for the channel's restricted markup, splits
//! oversized text at natural boundaries, delivers parts in order with
//! interactive controls on the final part only, and drives the
//! settings-menu state machine.

mod action;
mod channel;
mod chunk;
mod keyboard;
mod menu;
mod sanitize;

pub use action::MenuAction;
pub use channel::{deliver, Channel, DispatchError, DispatchResult, MessageRef, MESSAGE_LIMIT};
pub use chunk::split_message;
pub use keyboard::{Button, Keyboard};
pub use menu::{
    render_dashboard, render_picker, render_submenu, transition, MenuEffect, MenuState, MenuView,
    MODELS_PER_PAGE,
};
pub use sanitize::sanitize_html;
