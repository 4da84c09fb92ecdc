//! Owns the panel visibility map and the tiling tree derived from it.
//!
//! The visibility map is the single source of truth for which panels exist;
//! the tree is a rendering of that map plus whatever manual arrangement the
//! user made since the last visibility change. Every visibility change
//! rebuilds the tree as a balanced split over the visible set, discarding
//! manual edits.

use crate::layout::panel::PanelId;
use crate::layout::tree::{balanced_tree, LayoutNode};
use log::{debug, warn};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutController {
    visibility: BTreeMap<String, bool>,
    tree: Option<LayoutNode>,
}

impl LayoutController {
    /// Fresh controller: only the first known panel visible.
    pub fn new() -> Self {
        let mut visibility = BTreeMap::new();
        for id in PanelId::ALL {
            visibility.insert(id.key().to_string(), false);
        }
        visibility.insert(PanelId::ALL[0].key().to_string(), true);
        let tree = balanced_tree(&visible_of(&visibility));
        Self { visibility, tree }
    }

    /// Rehydrates from persisted state. Visibility and tree are stored
    /// independently and may disagree (a tree leaf whose panel is hidden, or
    /// an unknown key); the renderer tolerates that, so both are kept as-is.
    pub fn from_persisted(
        visibility: BTreeMap<String, bool>,
        tree: Option<LayoutNode>,
    ) -> Self {
        if visibility.is_empty() {
            let mut controller = Self::new();
            if let Some(tree) = tree {
                controller.tree = Some(tree);
            }
            return controller;
        }
        Self { visibility, tree }
    }

    pub fn visibility(&self) -> &BTreeMap<String, bool> {
        &self.visibility
    }

    pub fn tree(&self) -> Option<&LayoutNode> {
        self.tree.as_ref()
    }

    pub fn is_visible(&self, id: PanelId) -> bool {
        self.visibility.get(id.key()).copied().unwrap_or(false)
    }

    /// Known panel keys currently visible, in `PanelId` order.
    pub fn visible_ids(&self) -> Vec<String> {
        visible_of(&self.visibility)
    }

    /// Flips one panel's visibility and rebuilds the tree. Unknown ids are
    /// rejected silently; the UI should never offer them.
    pub fn toggle(&mut self, id: &str) -> bool {
        if PanelId::from_key(id).is_none() {
            debug!("ignoring toggle for unknown panel id {:?}", id);
            return false;
        }
        let entry = self.visibility.entry(id.to_string()).or_insert(false);
        *entry = !*entry;
        self.rebuild();
        true
    }

    /// Fulfils the empty-state "add a panel" action: makes the first hidden
    /// known panel visible. Falling back to the first known id means a
    /// caller invoked "add" without anything to add, which is worth a
    /// warning but not a failure.
    pub fn add_panel(&mut self) -> PanelId {
        let chosen = PanelId::ALL
            .iter()
            .copied()
            .find(|id| !self.is_visible(*id))
            .unwrap_or_else(|| {
                warn!("add_panel called with every panel already visible");
                PanelId::ALL[0]
            });
        self.toggle(chosen.key());
        chosen
    }

    /// Applies a manual drag/resize edit. Persisted verbatim until the next
    /// visibility-driven rebuild.
    pub fn set_tree(&mut self, tree: Option<LayoutNode>) {
        self.tree = tree;
    }

    fn rebuild(&mut self) {
        self.tree = balanced_tree(&self.visible_ids());
    }
}

impl Default for LayoutController {
    fn default() -> Self {
        Self::new()
    }
}

fn visible_of(visibility: &BTreeMap<String, bool>) -> Vec<String> {
    PanelId::ALL
        .iter()
        .filter(|id| visibility.get(id.key()).copied().unwrap_or(false))
        .map(|id| id.key().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tree::SplitDirection;

    #[test]
    fn fresh_controller_shows_first_panel() {
        let controller = LayoutController::new();
        assert_eq!(controller.visible_ids(), vec!["color_feed".to_string()]);
        assert_eq!(controller.tree(), Some(&LayoutNode::leaf("color_feed")));
    }

    #[test]
    fn unknown_id_is_rejected_silently() {
        let mut controller = LayoutController::new();
        let before = controller.clone();
        assert!(!controller.toggle("mystery"));
        assert_eq!(controller, before);
    }

    #[test]
    fn toggle_on_then_off_twice_restores_tree_shape() {
        let mut controller = LayoutController::new();
        let original = controller.tree().cloned();
        controller.toggle("field_view");
        assert_ne!(controller.tree().cloned(), original);
        controller.toggle("field_view");
        assert_eq!(controller.tree().cloned(), original);
        controller.toggle("field_view");
        controller.toggle("field_view");
        assert_eq!(controller.tree().cloned(), original);
    }

    #[test]
    fn hiding_everything_yields_no_tree() {
        let mut controller = LayoutController::new();
        controller.toggle("color_feed");
        assert!(controller.tree().is_none());
        assert!(controller.visible_ids().is_empty());
    }

    #[test]
    fn add_panel_picks_first_hidden_id() {
        let mut controller = LayoutController::new();
        controller.toggle("color_feed");
        let added = controller.add_panel();
        assert_eq!(added, PanelId::ColorFeed);
        assert!(controller.is_visible(PanelId::ColorFeed));
    }

    #[test]
    fn manual_edit_survives_until_next_visibility_change() {
        let mut controller = LayoutController::new();
        controller.toggle("field_view");
        let manual = LayoutNode::Split {
            direction: SplitDirection::Column,
            ratio: 0.8,
            first: Box::new(LayoutNode::leaf("field_view")),
            second: Box::new(LayoutNode::leaf("color_feed")),
        };
        controller.set_tree(Some(manual.clone()));
        assert_eq!(controller.tree(), Some(&manual));

        controller.toggle("raw_data");
        assert_ne!(controller.tree(), Some(&manual));
        assert_eq!(
            controller
                .tree()
                .map(|tree| tree.leaves().len())
                .unwrap_or(0),
            3
        );
    }

    #[test]
    fn persisted_state_may_disagree_with_tree() {
        let mut visibility = BTreeMap::new();
        visibility.insert("color_feed".to_string(), false);
        let tree = Some(LayoutNode::leaf("retired_panel"));
        let controller = LayoutController::from_persisted(visibility, tree.clone());
        assert!(controller.visible_ids().is_empty());
        assert_eq!(controller.tree(), tree.as_ref());
    }
}
