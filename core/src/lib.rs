//! State-synchronization core for the VAIRC telemetry dashboard.
//!
//! The modules cover the data that flows through the dashboard (detection
//! payloads, replay sessions, the tiling layout) plus the pure geometry the
//! canvas overlays need. Everything here is synchronous; streaming and UI
//! plumbing live in the `simulator` and `visualizer` crates.

pub mod layout;
pub mod persist;
pub mod prelude;
pub mod render;
pub mod replay;
pub mod telemetry;

use serde::{Deserialize, Serialize};

/// Which source feeds the "current detection payload".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    Server,
    Replay,
}

impl Default for AppMode {
    fn default() -> Self {
        AppMode::Server
    }
}

/// Common error type for core operations.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("no valid files found: {0}")]
    NoValidFiles(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
