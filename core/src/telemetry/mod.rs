pub mod mjpeg;
pub mod payload;
pub mod sse;
pub mod stats;

pub use mjpeg::MjpegDecoder;
pub use payload::{Detection, DetectionPayload, JetsonStats, Pose};
pub use sse::SseDecoder;
pub use stats::StreamStats;
