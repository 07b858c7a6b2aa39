//! Incremental decoder for a server-sent-events byte stream.
//!
//! The service frames every event as `data: <json>` followed by a blank
//! line. Chunks off the wire can split frames anywhere, so the decoder
//! buffers bytes, cuts them into lines, and hands back the data payload of
//! each completed frame. Field lines other than `data:` (ids, retry hints,
//! comments) are skipped.

#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns the payloads of every frame it completed.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                // Blank line terminates the frame; multi-line data joins
                // with newlines per the SSE format.
                if !self.data.is_empty() {
                    payloads.push(self.data.join("\n"));
                    self.data.clear();
                }
                continue;
            }

            if let Some(value) = line.strip_prefix("data:") {
                self.data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
            }
        }

        payloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_single_frame() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.feed(b"data: {\"type\":\"complete\"}\n\n");
        assert_eq!(payloads, vec![r#"{"type":"complete"}"#]);
    }

    #[test]
    fn reassembles_frames_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"type\":\"prog").is_empty());
        assert!(decoder.feed(b"ress\",\"progress\":10}\n").is_empty());
        let payloads = decoder.feed(b"\n");
        assert_eq!(payloads, vec![r#"{"type":"progress","progress":10}"#]);
    }

    #[test]
    fn decodes_multiple_frames_per_chunk() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.feed(b"data: one\n\ndata: two\n\n");
        assert_eq!(payloads, vec!["one", "two"]);
    }

    #[test]
    fn skips_comments_and_other_fields() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.feed(b": keepalive\nid: 7\nretry: 500\ndata: x\n\n");
        assert_eq!(payloads, vec!["x"]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.feed(b"data: x\r\n\r\n");
        assert_eq!(payloads, vec!["x"]);
    }

    #[test]
    fn blank_lines_without_data_emit_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"\n\n\n").is_empty());
    }
}
