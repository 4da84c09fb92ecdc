//! JPEG frame extraction from `multipart/x-mixed-replace` streams.
//!
//! Frames are located by their SOI/EOI markers rather than by parsing the
//! multipart boundary, so the decoder works against any producer. The
//! buffer is bounded; a runaway stream drops stale bytes instead of growing
//! without limit.

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];

/// Largest frame the dashboard will accept. Telemetry cameras produce
/// 640x480 JPEGs well under this.
const MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Default)]
pub struct MjpegDecoder {
    buffer: Vec<u8>,
}

impl MjpegDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one transport chunk and returns every complete JPEG frame
    /// it finished, in arrival order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();

        while let Some((start, end)) = find_jpeg_bounds(&self.buffer) {
            frames.push(self.buffer[start..end].to_vec());
            self.buffer.drain(..end);
        }

        if self.buffer.len() > MAX_FRAME_BYTES {
            // No frame will ever complete from this; keep only the tail in
            // case a marker straddles the cut.
            let drain_len = self.buffer.len() - 2;
            self.buffer.drain(..drain_len);
        }

        frames
    }
}

fn find_jpeg_bounds(buffer: &[u8]) -> Option<(usize, usize)> {
    let start = find_marker(buffer, &SOI)?;
    let end = find_marker(&buffer[start + 2..], &EOI)? + start + 2 + 2;
    Some((start, end))
}

fn find_marker(buffer: &[u8], marker: &[u8; 2]) -> Option<usize> {
    buffer.windows(2).position(|window| window == marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(body: &[u8]) -> Vec<u8> {
        let mut frame = SOI.to_vec();
        frame.extend_from_slice(body);
        frame.extend_from_slice(&EOI);
        frame
    }

    #[test]
    fn extracts_frame_with_multipart_noise() {
        let mut decoder = MjpegDecoder::new();
        let mut stream = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n".to_vec();
        let frame = jpeg(&[1, 2, 3]);
        stream.extend_from_slice(&frame);
        stream.extend_from_slice(b"\r\n");
        let frames = decoder.feed(&stream);
        assert_eq!(frames, vec![frame]);
    }

    #[test]
    fn frame_split_across_chunks() {
        let mut decoder = MjpegDecoder::new();
        let frame = jpeg(&[9; 32]);
        assert!(decoder.feed(&frame[..10]).is_empty());
        let frames = decoder.feed(&frame[10..]);
        assert_eq!(frames, vec![frame]);
    }

    #[test]
    fn multiple_frames_in_one_chunk() {
        let mut decoder = MjpegDecoder::new();
        let first = jpeg(&[1]);
        let second = jpeg(&[2]);
        let mut stream = first.clone();
        stream.extend_from_slice(&second);
        let frames = decoder.feed(&stream);
        assert_eq!(frames, vec![first, second]);
    }
}
