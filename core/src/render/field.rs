//! Geometry for the top-down field view.
//!
//! Field coordinates are inches with the origin at the field center and y
//! pointing "up"; canvas coordinates are pixels with the origin top-left and
//! y pointing down. The field is square, so one uniform scale keeps it
//! centered in the container.

use crate::render::overlay::Rgb;
use crate::telemetry::{DetectionPayload, Pose};

pub const FIELD_SIZE_INCHES: f32 = 152.0;
pub const ROBOT_SIZE_INCHES: f32 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl FieldTransform {
    pub fn new(container_width: f32, container_height: f32) -> Self {
        let scale =
            (container_width / FIELD_SIZE_INCHES).min(container_height / FIELD_SIZE_INCHES);
        Self {
            scale,
            offset_x: (container_width - FIELD_SIZE_INCHES * scale) / 2.0,
            offset_y: (container_height - FIELD_SIZE_INCHES * scale) / 2.0,
        }
    }

    /// Field inches (center origin, y-up) to canvas pixels (top-left
    /// origin, y-down).
    pub fn field_to_canvas(&self, field_x: f32, field_y: f32) -> (f32, f32) {
        let centered_x = field_x + FIELD_SIZE_INCHES / 2.0;
        let centered_y = FIELD_SIZE_INCHES / 2.0 - field_y;
        (
            centered_x * self.scale + self.offset_x,
            centered_y * self.scale + self.offset_y,
        )
    }
}

/// Opacity ramp: detections fade in between 20% and 100% confidence rather
/// than appearing at a hard cutoff.
pub fn confidence_opacity(confidence: f64) -> f32 {
    if confidence <= 0.2 {
        0.0
    } else if confidence >= 1.0 {
        1.0
    } else {
        ((confidence - 0.2) / 0.8) as f32
    }
}

/// Icon footprint by category, in inches of field space.
pub fn icon_size_inches(class: &str) -> f32 {
    match class.to_ascii_lowercase().as_str() {
        "red" | "blue" => 8.0,
        "goal" => 10.0,
        "bot" => 18.0,
        _ => 8.0,
    }
}

/// Solid-color stand-in when a category icon fails to load.
pub fn fallback_color(class: &str) -> Rgb {
    match class.to_ascii_lowercase().as_str() {
        "red" => Rgb::new(255, 0, 0),
        "blue" => Rgb::new(0, 0, 255),
        "goal" => Rgb::new(255, 255, 0),
        _ => Rgb::new(128, 128, 128),
    }
}

/// Source crop that squares an icon sprite: centered on the long axis.
pub fn crop_square(width: u32, height: u32) -> (u32, u32, u32) {
    let size = width.min(height);
    ((width - size) / 2, (height - size) / 2, size)
}

/// One world-positioned detection ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMarker {
    pub class: String,
    pub center_x: f32,
    pub center_y: f32,
    pub size_px: f32,
    pub opacity: f32,
}

/// Markers for every detection carrying absolute field coordinates, in
/// payload order (they draw behind the robot).
pub fn field_markers(payload: &DetectionPayload, transform: &FieldTransform) -> Vec<FieldMarker> {
    payload
        .detections
        .iter()
        .filter(|detection| detection.has_field_position())
        .map(|detection| {
            let (center_x, center_y) = transform.field_to_canvas(
                detection.fx.unwrap_or(0.0) as f32,
                detection.fy.unwrap_or(0.0) as f32,
            );
            FieldMarker {
                class: detection.class.clone(),
                center_x,
                center_y,
                size_px: icon_size_inches(&detection.class) * transform.scale,
                opacity: confidence_opacity(detection.confidence),
            }
        })
        .collect()
}

/// The robot as a rotated square, corners in canvas pixels. Rotation is CCW
/// with `theta` in degrees and 0° pointing field north; the 0-1 edge is the
/// front face the renderer highlights.
pub fn robot_corners(pose: &Pose, transform: &FieldTransform) -> [(f32, f32); 4] {
    let (center_x, center_y) = transform.field_to_canvas(pose.x as f32, pose.y as f32);
    let half = ROBOT_SIZE_INCHES * transform.scale / 2.0;
    let theta = (pose.theta as f32).to_radians();
    let (sin, cos) = theta.sin_cos();

    let corners = [(-half, -half), (half, -half), (half, half), (-half, half)];
    corners.map(|(x, y)| {
        let rotated_x = x * cos + y * sin;
        let rotated_y = -x * sin + y * cos;
        (center_x + rotated_x, center_y + rotated_y)
    })
}
