//! Persisted catalog UI state
//!
//! Page and search text are the only catalog fields surviving a reload.
//! They live under one fixed key in the session area; everything else
//! resets to defaults.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::area::StorageArea;

/// Fixed key for the persisted slice of catalog state.
const PERSIST_KEY: &str = "products-persist";

/// The slice of catalog state that survives a reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedUiState {
    pub page: u32,
    #[serde(rename = "searchQuery")]
    pub search_query: String,
}

impl Default for PersistedUiState {
    fn default() -> Self {
        Self {
            page: 1,
            search_query: String::new(),
        }
    }
}

/// Reads and writes [`PersistedUiState`] through a storage area.
#[derive(Clone)]
pub struct UiStatePersist {
    area: Arc<dyn StorageArea>,
}

impl UiStatePersist {
    pub fn new(area: Arc<dyn StorageArea>) -> Self {
        Self { area }
    }

    /// Restore the persisted slice; defaults when absent or unreadable.
    pub fn load(&self) -> PersistedUiState {
        self.area
            .get(PERSIST_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Persist the current page and search text.
    pub fn save(&self, state: &PersistedUiState) {
        match serde_json::to_string(state) {
            Ok(raw) => {
                if let Err(e) = self.area.set(PERSIST_KEY, &raw) {
                    tracing::warn!("Failed to persist catalog UI state: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to encode catalog UI state: {}", e),
        }
    }
}
