//! Durable dashboard state.
//!
//! The browser incarnation of this dashboard kept a handful of opaque
//! localStorage entries; here they form one JSON file. Loading reads raw
//! bytes, attempts a structured decode and substitutes the defaults on
//! absence or failure, performed once at construction. Saves are
//! synchronous on every change; a failed save degrades persistence, not the
//! session.

use crate::layout::LayoutNode;
use crate::AppMode;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_SERVER: &str = "192.168.86.98:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub server: String,
    pub mode: AppMode,
    pub visibility: BTreeMap<String, bool>,
    pub layout: Option<LayoutNode>,
    pub show_boxes: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            mode: AppMode::Server,
            visibility: BTreeMap::new(),
            layout: None,
            show_boxes: true,
        }
    }
}

impl PersistedState {
    /// Reads state from disk, falling back to defaults when the file is
    /// absent or does not decode. Never fails.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(err) => {
                warn!(
                    "persisted state at {} did not decode ({}); using defaults",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Writes state synchronously. Failures are logged and otherwise
    /// ignored; the in-memory session continues.
    pub fn save(&self, path: &Path) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(err) => {
                warn!("could not encode persisted state: {}", err);
                return;
            }
        };
        if let Err(err) = std::fs::write(path, json) {
            warn!("could not write {}: {}", path.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutController;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let state = PersistedState::load(&dir.path().join("absent.json"));
        assert_eq!(state, PersistedState::default());
        assert_eq!(state.server, DEFAULT_SERVER);
        assert!(state.show_boxes);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert_eq!(PersistedState::load(&path), PersistedState::default());
    }

    #[test]
    fn visibility_map_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut controller = LayoutController::new();
        controller.toggle("field_view");
        let state = PersistedState {
            visibility: controller.visibility().clone(),
            layout: controller.tree().cloned(),
            mode: AppMode::Replay,
            ..PersistedState::default()
        };
        state.save(&path);

        let restored = PersistedState::load(&path);
        assert_eq!(restored, state);

        let rehydrated =
            LayoutController::from_persisted(restored.visibility, restored.layout);
        assert_eq!(rehydrated.visibility(), controller.visibility());
        assert_eq!(rehydrated.tree(), controller.tree());
    }

    #[test]
    fn partial_state_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, br#"{"mode":"replay"}"#).unwrap();
        let state = PersistedState::load(&path);
        assert_eq!(state.mode, AppMode::Replay);
        assert_eq!(state.server, DEFAULT_SERVER);
    }
}
