//! The tiling-window tree: leaves are panel keys, internal nodes carry a
//! split direction and ratio. Serialized verbatim to durable storage, so
//! leaves stay plain strings and unknown keys survive a round trip.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    Row,
    Column,
}

impl SplitDirection {
    fn flipped(self) -> Self {
        match self {
            SplitDirection::Row => SplitDirection::Column,
            SplitDirection::Column => SplitDirection::Row,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutNode {
    Leaf(String),
    Split {
        direction: SplitDirection,
        ratio: f64,
        first: Box<LayoutNode>,
        second: Box<LayoutNode>,
    },
}

impl LayoutNode {
    pub fn leaf(key: impl Into<String>) -> Self {
        LayoutNode::Leaf(key.into())
    }

    /// Panel keys in left-to-right order.
    pub fn leaves(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.collect_leaves(&mut keys);
        keys
    }

    fn collect_leaves<'a>(&'a self, keys: &mut Vec<&'a str>) {
        match self {
            LayoutNode::Leaf(key) => keys.push(key),
            LayoutNode::Split { first, second, .. } => {
                first.collect_leaves(keys);
                second.collect_leaves(keys);
            }
        }
    }
}

/// Builds a balanced binary split over the given leaves, alternating the
/// split direction level by level. Returns `None` for an empty set, which
/// renders as the zero-state affordance.
pub fn balanced_tree(leaves: &[String]) -> Option<LayoutNode> {
    build(leaves, SplitDirection::Row)
}

fn build(leaves: &[String], direction: SplitDirection) -> Option<LayoutNode> {
    match leaves {
        [] => None,
        [only] => Some(LayoutNode::leaf(only.clone())),
        _ => {
            let mid = (leaves.len() + 1) / 2;
            Some(LayoutNode::Split {
                direction,
                ratio: 0.5,
                first: Box::new(build(&leaves[..mid], direction.flipped())?),
                second: Box::new(build(&leaves[mid..], direction.flipped())?),
            })
        }
    }
}
