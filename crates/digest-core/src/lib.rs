//! Core types shared across the digest workspace.
//!
//! Conversation turns, the per-user settings record with its enumerated
//! option sets, the pure prompt builder, the UI string catalog and the
//! environment-sourced configuration.

pub mod config;
pub mod i18n;
pub mod prompt;
pub mod settings;
pub mod turn;

pub use config::Config;
pub use i18n::{tr, MsgKey, UiLanguage};
pub use prompt::{build_prompt, Prompt};
pub use settings::{
    Creativity, ModelInfo, ModelKind, SettingField, Settings, SummaryLanguage, SummaryLength, Tone,
};
pub use turn::{ContentPart, Role, Turn, TurnContent};
