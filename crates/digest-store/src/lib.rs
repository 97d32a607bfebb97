//! SQLite-backed persistence for user settings and conversations.
//!
//! `SqliteStore` is the real storage with `Result`-returning operations;
//! `SessionStore` wraps any storage and degrades to defaults/empty on
//! error so an interactive session never crashes on a storage fault.

mod error;
mod session;
mod store;

pub use error::{StoreError, StoreResult};
pub use session::SessionStore;
pub use store::{ConversationStore, SettingsStore, SqliteStore};
