pub mod field;
pub mod overlay;

pub use field::{FieldMarker, FieldTransform};
pub use overlay::{fit_contain, overlay_boxes, OverlayBox, Rect, RenderedImage, Rgb};
