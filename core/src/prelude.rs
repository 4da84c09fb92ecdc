//! Convenience re-exports for dashboard consumers.

pub use crate::layout::{balanced_tree, LayoutController, LayoutNode, PanelId, SplitDirection};
pub use crate::persist::PersistedState;
pub use crate::render::overlay::{fit_contain, overlay_boxes, OverlayBox, RenderedImage};
pub use crate::replay::{FrameState, Playback, ReplaySession};
pub use crate::telemetry::{Detection, DetectionPayload, JetsonStats, Pose};
pub use crate::{AppMode, DashboardError, DashboardResult};
