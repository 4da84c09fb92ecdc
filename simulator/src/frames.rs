//! Synthetic JPEG rendering for the camera streams and recorded sessions.
//!
//! Frames are simple enough to draw by hand: a flat background plus a
//! filled rectangle per detection in its class color. The depth variant is
//! a grayscale gradient so the two feeds are visually distinct.

use anyhow::Context;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use vairccore::prelude::DetectionPayload;
use vairccore::render::overlay::class_color;

pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;
const JPEG_QUALITY: u8 = 80;

pub fn render_color_frame(payload: &DetectionPayload, tick: u64) -> anyhow::Result<Vec<u8>> {
    let shade = 40 + ((tick % 60) as u8);
    let mut frame = RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, Rgb([shade, shade, 48]));

    for detection in &payload.detections {
        let color = class_color(&detection.class);
        fill_box(
            &mut frame,
            detection.x,
            detection.y,
            detection.width,
            detection.height,
            Rgb([color.r, color.g, color.b]),
        );
    }

    encode(&frame)
}

pub fn render_depth_frame(payload: &DetectionPayload, _tick: u64) -> anyhow::Result<Vec<u8>> {
    let mut frame = RgbImage::new(FRAME_WIDTH, FRAME_HEIGHT);
    for (x, _, pixel) in frame.enumerate_pixels_mut() {
        let shade = (x * 255 / FRAME_WIDTH) as u8;
        *pixel = Rgb([shade, shade, shade]);
    }

    for detection in &payload.detections {
        // Nearer objects render brighter.
        let depth = detection.depth.unwrap_or(4.0).clamp(0.0, 4.0);
        let shade = 255 - (depth / 4.0 * 200.0) as u8;
        fill_box(
            &mut frame,
            detection.x,
            detection.y,
            detection.width,
            detection.height,
            Rgb([shade, shade, shade]),
        );
    }

    encode(&frame)
}

fn fill_box(frame: &mut RgbImage, cx: f64, cy: f64, width: f64, height: f64, color: Rgb<u8>) {
    let x0 = ((cx - width / 2.0).max(0.0)) as u32;
    let y0 = ((cy - height / 2.0).max(0.0)) as u32;
    let x1 = ((cx + width / 2.0).min(f64::from(FRAME_WIDTH))) as u32;
    let y1 = ((cy + height / 2.0).min(f64::from(FRAME_HEIGHT))) as u32;
    for y in y0..y1.min(FRAME_HEIGHT) {
        for x in x0..x1.min(FRAME_WIDTH) {
            frame.put_pixel(x, y, color);
        }
    }
}

fn encode(frame: &RgbImage) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    frame
        .write_with_encoder(encoder)
        .context("encoding synthetic frame")?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::FrameGenerator;
    use crate::scenario::ScenarioConfig;

    #[test]
    fn frames_are_valid_jpegs() {
        let mut generator = FrameGenerator::new(ScenarioConfig::from_args(10, 1, 5));
        let payload = generator.next_payload();

        for bytes in [
            render_color_frame(&payload, 1).unwrap(),
            render_depth_frame(&payload, 1).unwrap(),
        ] {
            assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
            assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!(decoded.width(), FRAME_WIDTH);
            assert_eq!(decoded.height(), FRAME_HEIGHT);
        }
    }
}
