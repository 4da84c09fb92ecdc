//! Incremental decoder for `text/event-stream` bodies.
//!
//! The transport hands us arbitrary byte chunks; events are terminated by a
//! blank line and may span chunks. Only `data:` fields matter to the
//! dashboard; comments and other fields are ignored.

/// Buffering decoder. Feed it chunks, drain complete messages.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one transport chunk and returns the data payloads of every
    /// event completed by it, in arrival order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut messages = Vec::new();

        while let Some(line_end) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=line_end).collect();
            let mut line = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
            if line.ends_with('\r') {
                line.pop();
            }

            if line.is_empty() {
                // Blank line ends the event.
                if !self.data_lines.is_empty() {
                    messages.push(self.data_lines.join("\n"));
                    self.data_lines.clear();
                }
            } else if let Some(value) = line.strip_prefix("data:") {
                self.data_lines
                    .push(value.strip_prefix(' ').unwrap_or(value).to_string());
            }
            // Comments (":...") and fields like "event:"/"id:" carry nothing
            // the dashboard consumes.
        }

        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_event_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let messages = decoder.feed(b"data: {\"stuff\":[]}\n\n");
        assert_eq!(messages, vec!["{\"stuff\":[]}".to_string()]);
    }

    #[test]
    fn event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"stu").is_empty());
        assert!(decoder.feed(b"ff\":[]}\n").is_empty());
        let messages = decoder.feed(b"\n");
        assert_eq!(messages, vec!["{\"stuff\":[]}".to_string()]);
    }

    #[test]
    fn crlf_and_comments_are_tolerated() {
        let mut decoder = SseDecoder::new();
        let messages = decoder.feed(b": keepalive\r\ndata: one\r\n\r\ndata: two\r\n\r\n");
        assert_eq!(messages, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn multi_line_data_joined_with_newline() {
        let mut decoder = SseDecoder::new();
        let messages = decoder.feed(b"data: a\ndata: b\n\n");
        assert_eq!(messages, vec!["a\nb".to_string()]);
    }

    #[test]
    fn blank_line_without_data_emits_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"\n\nevent: ping\n\n").is_empty());
    }
}
