use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ops::filter::Filter;

const STATE_FILE: &str = ".state.json";

/// Persisted UI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Filter last chosen with `td list --filter`
    #[serde(default)]
    pub filter: Option<Filter>,
}

/// Read .state.json from the data directory. Missing or unreadable state is
/// treated as absent.
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let path = data_dir.join(STATE_FILE);
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed ui state");
            None
        }
    }
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = data_dir.join(STATE_FILE);
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
