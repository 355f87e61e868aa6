//! Server-sent-event decoding for streamed chat completions.
//!
//! The upstream body arrives in arbitrary byte chunks; a `data:` line may be split
//! anywhere, including inside a multi-byte character. `SseLineBuffer` holds the
//! unterminated tail until the rest of the line arrives.

use serde::Deserialize;

/// One meaningful event extracted from a `data:` line.
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    /// A non-empty piece of generated text.
    Delta(String),
    /// The `[DONE]` sentinel.
    Done,
    /// An in-band `{"error": {...}}` payload; the stream is broken.
    Error(String),
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<StreamError>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// Reassembles newline-terminated lines from a byte stream.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    /// Appends a chunk and drains every complete line, without its terminator.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            lines.push(line.trim_end_matches('\r').to_string());
        }
        lines
    }

    /// Returns whatever unterminated text is left once the body has ended.
    pub fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.pending);
        Some(line.trim_end_matches('\r').to_string())
    }
}

/// Interprets one SSE line. Comments, blank lines, other fields, empty deltas,
/// and unparseable payloads yield `None`.
pub fn parse_line(line: &str) -> Option<SseEvent> {
    let data = line.strip_prefix("data:")?.trim_start();

    if data.trim() == "[DONE]" {
        return Some(SseEvent::Done);
    }

    let chunk: StreamChunk = serde_json::from_str(data).ok()?;
    if let Some(error) = chunk.error {
        let message = if error.message.is_empty() {
            "upstream reported an error".to_string()
        } else {
            error.message
        };
        return Some(SseEvent::Error(message));
    }

    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .filter(|text| !text.is_empty())
        .map(SseEvent::Delta)
}
