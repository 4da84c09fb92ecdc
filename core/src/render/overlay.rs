//! Geometry for the camera detection overlay.
//!
//! Detections arrive in the producer's native pixel space (center-based
//! boxes); the image on screen is contain-scaled and letterboxed inside its
//! container. Everything here is pure math so the canvas program just draws
//! what it is handed.

use crate::telemetry::DetectionPayload;

/// Label typography. iced canvas has no text measurement, so the background
/// uses a fixed-advance monospace estimate.
pub const LABEL_FONT_SIZE: f32 = 12.0;
const LABEL_CHAR_ADVANCE: f32 = LABEL_FONT_SIZE * 0.6;
const LABEL_PADDING: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color keyed by detection class; unknown classes get the magenta fallback.
pub fn class_color(class: &str) -> Rgb {
    match class.to_ascii_lowercase().as_str() {
        "blue" => Rgb::new(0x00, 0x00, 0xFF),
        "goal" => Rgb::new(0xFF, 0xD7, 0x00),
        "red" => Rgb::new(0xFF, 0x00, 0x00),
        "bot" => Rgb::new(0x00, 0x00, 0x00),
        _ => Rgb::new(0xFF, 0x00, 0xFF),
    }
}

/// Where the contain-scaled image actually sits within its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedImage {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

/// Contain-mode fit: preserve aspect ratio, center, letterbox the leftover
/// axis. The two scale factors come out equal here, but downstream math
/// applies them per-axis so a non-uniform fit would still render correctly.
pub fn fit_contain(
    container_width: f32,
    container_height: f32,
    native_width: f32,
    native_height: f32,
) -> RenderedImage {
    let image_aspect = native_width / native_height;
    let container_aspect = container_width / container_height;

    let (width, height, offset_x, offset_y) = if image_aspect > container_aspect {
        let width = container_width;
        let height = width / image_aspect;
        (width, height, 0.0, (container_height - height) / 2.0)
    } else {
        let height = container_height;
        let width = height * image_aspect;
        (width, height, (container_width - width) / 2.0, 0.0)
    };

    RenderedImage {
        offset_x,
        offset_y,
        width,
        height,
        scale_x: width / native_width,
        scale_y: height / native_height,
    }
}

/// One drawable overlay entry: box outline plus label background, in
/// container pixel space. `index` is the detection's position within the
/// payload, kept so selection can follow a specific detection.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub index: usize,
    pub rect: Rect,
    pub color: Rgb,
    pub label: String,
    pub label_rect: Rect,
}

/// Computes every drawable box for the given payload. Detections with
/// non-finite coordinates are skipped, never fatal.
pub fn overlay_boxes(
    payload: &DetectionPayload,
    container_width: f32,
    container_height: f32,
    native_width: f32,
    native_height: f32,
) -> Vec<OverlayBox> {
    if container_width <= 0.0 || container_height <= 0.0 {
        return Vec::new();
    }
    let fit = fit_contain(container_width, container_height, native_width, native_height);

    payload
        .detections
        .iter()
        .enumerate()
        .filter_map(|(index, detection)| {
            let (x, y) = (detection.x as f32, detection.y as f32);
            let (w, h) = (detection.width as f32, detection.height as f32);
            if ![x, y, w, h].iter().all(|v| v.is_finite()) {
                return None;
            }

            let rect = Rect {
                x: (x - w / 2.0) * fit.scale_x + fit.offset_x,
                y: (y - h / 2.0) * fit.scale_y + fit.offset_y,
                width: w * fit.scale_x,
                height: h * fit.scale_y,
            };

            let mut label = format!("{} {:.2}", detection.class, detection.confidence);
            if let Some(depth) = detection.depth {
                if depth >= 0.0 {
                    label.push_str(&format!(" d={:.2}m", depth));
                }
            }

            let label_width = label.chars().count() as f32 * LABEL_CHAR_ADVANCE + LABEL_PADDING;
            let label_height = LABEL_FONT_SIZE + LABEL_PADDING;
            // Above the box; flipped below when that would clip the top edge.
            let mut label_y = rect.y - label_height;
            if label_y < 0.0 {
                label_y = rect.y + rect.height + LABEL_PADDING / 2.0;
            }
            let label_rect = Rect {
                x: rect.x - 2.0,
                y: label_y,
                width: label_width,
                height: label_height,
            };

            Some(OverlayBox {
                index,
                rect,
                color: class_color(&detection.class),
                label,
                label_rect,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::Detection;

    fn centered_detection() -> DetectionPayload {
        DetectionPayload {
            detections: vec![Detection {
                x: 320.0,
                y: 240.0,
                width: 100.0,
                height: 50.0,
                class: "red".to_string(),
                confidence: 0.9,
                depth: None,
                fx: None,
                fy: None,
                fz: None,
            }],
            pose: None,
            jetson: None,
        }
    }

    #[test]
    fn contain_fit_letterboxes_the_short_axis() {
        let fit = fit_contain(1000.0, 400.0, 640.0, 480.0);
        assert_eq!(fit.height, 400.0);
        assert!((fit.width - 533.333_3).abs() < 0.01);
        assert_eq!(fit.offset_y, 0.0);
        assert!((fit.offset_x - (1000.0 - fit.width) / 2.0).abs() < 0.001);
        assert!((fit.scale_x - fit.scale_y).abs() < 1e-6);
    }

    #[test]
    fn centered_detection_lands_at_rendered_center() {
        // Square, wide and tall containers all keep the native center on
        // the rendered image's geometric center.
        for (cw, ch) in [(500.0, 500.0), (1000.0, 400.0), (300.0, 900.0)] {
            let boxes = overlay_boxes(&centered_detection(), cw, ch, 640.0, 480.0);
            let fit = fit_contain(cw, ch, 640.0, 480.0);
            let (bx, by) = boxes[0].rect.center();
            let expected_x = fit.offset_x + fit.width / 2.0;
            let expected_y = fit.offset_y + fit.height / 2.0;
            assert!((bx - expected_x).abs() < 1.0, "x off in {}x{}", cw, ch);
            assert!((by - expected_y).abs() < 1.0, "y off in {}x{}", cw, ch);
        }
    }

    #[test]
    fn label_flips_below_when_clipping_the_top() {
        let mut payload = centered_detection();
        payload.detections[0].y = 10.0;
        let boxes = overlay_boxes(&payload, 640.0, 480.0, 640.0, 480.0);
        let entry = &boxes[0];
        assert!(entry.label_rect.y > entry.rect.y);

        payload.detections[0].y = 240.0;
        let boxes = overlay_boxes(&payload, 640.0, 480.0, 640.0, 480.0);
        let entry = &boxes[0];
        assert!(entry.label_rect.y < entry.rect.y);
    }

    #[test]
    fn depth_is_appended_when_present_and_non_negative() {
        let mut payload = centered_detection();
        payload.detections[0].depth = Some(1.25);
        let boxes = overlay_boxes(&payload, 640.0, 480.0, 640.0, 480.0);
        assert_eq!(boxes[0].label, "red 0.90 d=1.25m");

        payload.detections[0].depth = Some(-1.0);
        let boxes = overlay_boxes(&payload, 640.0, 480.0, 640.0, 480.0);
        assert_eq!(boxes[0].label, "red 0.90");
    }

    #[test]
    fn non_finite_detections_are_skipped_but_keep_indices() {
        let mut payload = centered_detection();
        payload.detections.push(payload.detections[0].clone());
        payload.detections[0].x = f64::NAN;
        let boxes = overlay_boxes(&payload, 640.0, 480.0, 640.0, 480.0);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].index, 1);
    }

    #[test]
    fn unknown_class_gets_fallback_color() {
        assert_eq!(class_color("???"), Rgb::new(0xFF, 0x00, 0xFF));
        assert_eq!(class_color("RED"), Rgb::new(0xFF, 0x00, 0x00));
    }
}
