//! Storage tiers
//!
//! Two browser-like persistence scopes behind one trait: a durable area
//! surviving restarts (JSON files on disk) and a session area that dies
//! with the process. The token store and the persisted UI state are pure
//! storage indirection on top - no network or validation logic here.

pub mod area;
pub mod token;
pub mod ui_state;

pub use area::{FileArea, MemoryArea, StorageArea};
pub use token::TokenStore;
pub use ui_state::{PersistedUiState, UiStatePersist};
