use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One detected object within a frame, in the producer's native image pixel
/// space. The box is center-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub class: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fz: Option<f64>,
}

impl Detection {
    /// True when the detection carries absolute field coordinates and can be
    /// placed on the top-down field view.
    pub fn has_field_position(&self) -> bool {
        self.fx.is_some() && self.fy.is_some()
    }
}

/// Robot position in field inches / degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

/// System stats reported by the onboard computer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JetsonStats {
    pub cpu_temp: f64,
    pub gpu_temp: f64,
    pub uptime: f64,
}

impl JetsonStats {
    /// Formats uptime seconds as `DD:HH:MM:SS`.
    pub fn format_uptime(&self) -> String {
        let total = self.uptime.max(0.0) as u64;
        let days = total / 86_400;
        let hours = (total % 86_400) / 3_600;
        let minutes = (total % 3_600) / 60;
        let seconds = total % 60;
        format!("{:02}:{:02}:{:02}:{:02}", days, hours, minutes, seconds)
    }
}

/// One telemetry frame. Renderers only ever see payloads that passed
/// structural validation; a malformed `stuff` array is normalized to empty
/// detections before the payload leaves this module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DetectionPayload {
    #[serde(rename = "stuff")]
    pub detections: Vec<Detection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jetson: Option<JetsonStats>,
}

impl DetectionPayload {
    /// The normalized default shown before any frame has arrived.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses one wire message.
    ///
    /// Returns `None` for non-JSON or non-object messages; the caller must
    /// leave its prior state unchanged. An object with a missing or
    /// malformed `stuff` array is still accepted, with detections
    /// normalized to empty. Entries of `stuff` that fail the six-field
    /// structural check are skipped, never fatal.
    pub fn parse_message(raw: &str) -> Option<Self> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                debug!("dropping unparseable message: {} ({})", err, sample(raw));
                return None;
            }
        };
        let object = match value {
            Value::Object(object) => object,
            _ => {
                debug!("dropping non-object message: {}", sample(raw));
                return None;
            }
        };

        let detections = match object.get("stuff") {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(|entry| match serde_json::from_value(entry.clone()) {
                    Ok(detection) => Some(detection),
                    Err(err) => {
                        debug!("skipping malformed detection entry: {}", err);
                        None
                    }
                })
                .collect(),
            Some(_) | None => {
                warn!("message missing 'stuff' array; normalizing to empty detections");
                Vec::new()
            }
        };

        let pose = object.get("pose").and_then(|value| {
            match serde_json::from_value::<Pose>(value.clone()) {
                Ok(pose) => Some(pose),
                Err(_) => {
                    warn!("dropping malformed pose: {}", value);
                    None
                }
            }
        });

        let jetson = object
            .get("jetson")
            .and_then(|value| serde_json::from_value::<JetsonStats>(value.clone()).ok());

        Some(Self {
            detections,
            pose,
            jetson,
        })
    }
}

fn sample(raw: &str) -> &str {
    match raw.char_indices().nth(200) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}
