use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::store::atomic_write;

pub const STATE_FILE: &str = ".state.json";

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UiState {
    /// Selected folder id
    #[serde(default)]
    pub selected_folder: Option<String>,
    /// Sidebar width in cells, once the user has dragged the divider
    #[serde(default)]
    pub sidebar_width: Option<u16>,
    /// Last sidebar search term
    #[serde(default)]
    pub last_search: Option<String>,
}

/// Read .state.json from the data directory
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(data_dir.join(STATE_FILE)).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable ui state");
            None
        }
    }
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&data_dir.join(STATE_FILE), content.as_bytes())
}
