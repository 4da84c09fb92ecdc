use serde::{Deserialize, Serialize};

/// The closed set of panel types the dashboard can mount. Persisted layouts
/// may still reference keys outside this set (e.g. from an older build);
/// renderers show those as a "component not found" tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    ColorFeed,
    DepthFeed,
    RawData,
    FieldView,
    Details,
    Help,
}

impl PanelId {
    pub const ALL: [PanelId; 6] = [
        PanelId::ColorFeed,
        PanelId::DepthFeed,
        PanelId::RawData,
        PanelId::FieldView,
        PanelId::Details,
        PanelId::Help,
    ];

    /// Stable key used in persisted visibility maps and layout trees.
    pub fn key(&self) -> &'static str {
        match self {
            PanelId::ColorFeed => "color_feed",
            PanelId::DepthFeed => "depth_feed",
            PanelId::RawData => "raw_data",
            PanelId::FieldView => "field_view",
            PanelId::Details => "details",
            PanelId::Help => "help",
        }
    }

    pub fn from_key(key: &str) -> Option<PanelId> {
        PanelId::ALL.iter().copied().find(|id| id.key() == key)
    }

    pub fn title(&self) -> &'static str {
        match self {
            PanelId::ColorFeed => "Color Feed",
            PanelId::DepthFeed => "Depth Feed",
            PanelId::RawData => "Raw Data",
            PanelId::FieldView => "Field View",
            PanelId::Details => "Details",
            PanelId::Help => "Help",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for id in PanelId::ALL {
            assert_eq!(PanelId::from_key(id.key()), Some(id));
        }
        assert_eq!(PanelId::from_key("mystery"), None);
    }
}
