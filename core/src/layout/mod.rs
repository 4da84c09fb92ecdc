pub mod controller;
pub mod panel;
pub mod tree;

pub use controller::LayoutController;
pub use panel::PanelId;
pub use tree::{balanced_tree, LayoutNode, SplitDirection};
