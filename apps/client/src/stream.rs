//! Streaming consumption loop.
//!
//! Each plan request owns one `PlanSession`. Every received chunk is appended to
//! the accumulated text and the whole text is reparsed, so the displayed plan is
//! always a best-effort view of what has arrived so far. The loop ends only when
//! the transport ends; a transport error discards everything built so far.

use futures::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::plan::{parse_plan, DayBlock};

/// Shown in place of the plan when generation fails.
pub const GENERATE_ERROR_MESSAGE: &str = "Failed to generate workout plan. Please try again.";

/// Accumulated response text and the plan derived from it, for one request.
#[derive(Debug, Default)]
pub struct PlanSession {
    text: String,
    /// Bytes of a code point split across chunks.
    pending: Vec<u8>,
    plan: Vec<DayBlock>,
    chunks: usize,
}

impl PlanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a raw chunk and reparses the full accumulated text.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> &[DayBlock] {
        self.pending.extend_from_slice(chunk);
        decode_utf8_prefix(&mut self.pending, &mut self.text);
        self.chunks += 1;
        self.plan = parse_plan(&self.text);
        &self.plan
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn plan(&self) -> &[DayBlock] {
        &self.plan
    }

    /// Ends the session at end-of-stream. Bytes of an unfinished code point
    /// are decoded lossily.
    pub fn finish(mut self) -> Vec<DayBlock> {
        if !self.pending.is_empty() {
            warn!(
                bytes = self.pending.len(),
                "Plan stream ended inside a UTF-8 sequence"
            );
            self.text.push_str(&String::from_utf8_lossy(&self.pending));
            self.plan = parse_plan(&self.text);
        }
        debug!(
            chunks = self.chunks,
            days = self.plan.len(),
            "Plan stream complete"
        );
        self.plan
    }
}

/// Moves every complete UTF-8 sequence from `bytes` into `out`, leaving only an
/// incomplete trailing sequence behind. Invalid sequences become U+FFFD.
fn decode_utf8_prefix(bytes: &mut Vec<u8>, out: &mut String) {
    loop {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                out.push_str(s);
                bytes.clear();
                return;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                // valid_up_to marks a char boundary, so this slice is valid UTF-8
                out.push_str(&String::from_utf8_lossy(&bytes[..valid]));
                match e.error_len() {
                    Some(bad) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        bytes.drain(..valid + bad);
                    }
                    None => {
                        bytes.drain(..valid);
                        return;
                    }
                }
            }
        }
    }
}

/// What the user sees for the current plan request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlanView {
    #[default]
    Idle,
    /// Request in flight; holds the latest best-effort parse.
    Streaming(Vec<DayBlock>),
    Ready(Vec<DayBlock>),
    /// Generation failed. No partial plan is kept.
    Failed(String),
}

impl PlanView {
    /// Starts a new request, dropping any previous plan or error.
    pub fn begin(&mut self) {
        *self = PlanView::Streaming(Vec::new());
    }

    pub fn update(&mut self, plan: &[DayBlock]) {
        *self = PlanView::Streaming(plan.to_vec());
    }

    pub fn settle(&mut self, result: Result<Vec<DayBlock>, ClientError>) {
        *self = match result {
            Ok(plan) => PlanView::Ready(plan),
            Err(e) => {
                warn!("Plan generation failed: {e}");
                PlanView::Failed(GENERATE_ERROR_MESSAGE.to_string())
            }
        };
    }

    pub fn plan(&self) -> &[DayBlock] {
        match self {
            PlanView::Streaming(plan) | PlanView::Ready(plan) => plan,
            PlanView::Idle | PlanView::Failed(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PlanView::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PlanView::Streaming(_))
    }
}

/// Drains a chunk stream, calling `on_update` with the reparsed plan after every
/// chunk. Returns the final plan, or the first transport error with all partial
/// state dropped.
pub async fn consume_plan_stream<S, B, E, F>(
    stream: S,
    mut on_update: F,
) -> Result<Vec<DayBlock>, ClientError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<ClientError>,
    F: FnMut(&[DayBlock]),
{
    let mut stream = std::pin::pin!(stream);
    let mut session = PlanSession::new();

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => on_update(session.push_chunk(bytes.as_ref())),
            Err(e) => {
                let error: ClientError = e.into();
                warn!(
                    received = session.text().len(),
                    "Plan stream failed: {error}"
                );
                return Err(error);
            }
        }
    }

    Ok(session.finish())
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;

    fn chunks(parts: &[&'static str]) -> Vec<Result<&'static [u8], ClientError>> {
        parts.iter().map(|p| Ok(p.as_bytes())).collect()
    }

    #[tokio::test]
    async fn test_consume_applies_chunks_in_order_and_reparses_each_time() {
        let parts = [
            "Day 1 (~30 min):\n• Squ",
            "at 3x10 – brace\n• Push-up 3x8 – elbows in\n\nDa",
            "y 2 (~25 min):\n• Plank 3x30s – neutral spine\n",
        ];
        let mut day_counts = Vec::new();

        let plan = consume_plan_stream(stream::iter(chunks(&parts)), |plan| {
            day_counts.push(plan.len())
        })
        .await
        .unwrap();

        assert_eq!(day_counts, vec![1, 1, 2]);
        assert_eq!(plan, parse_plan(&parts.concat()));
        assert_eq!(plan[0].exercises[0].text, "• Squat 3x10 – brace");
    }

    #[tokio::test]
    async fn test_consume_shows_partial_bullets_while_streaming() {
        let mut snapshots = Vec::new();

        consume_plan_stream(
            stream::iter(chunks(&["Day 1:\n• Goblet", " Squat"])),
            |plan| snapshots.push(plan[0].exercises[0].text.clone()),
        )
        .await
        .unwrap();

        assert_eq!(snapshots, vec!["• Goblet", "• Goblet Squat"]);
    }

    #[tokio::test]
    async fn test_consume_empty_stream_yields_empty_plan() {
        let plan = consume_plan_stream(stream::iter(chunks(&[])), |_| {})
            .await
            .unwrap();
        assert!(plan.is_empty());
    }

    #[tokio::test]
    async fn test_mid_stream_failure_leaves_view_failed_without_plan() {
        let items: Vec<Result<&'static [u8], ClientError>> = vec![
            Ok(b"Day 1:\n".as_slice()),
            Ok("• Push-up 3x10 – brace\n".as_bytes()),
            Err(ClientError::Stream("connection reset".to_string())),
        ];
        let mut view = PlanView::default();
        view.begin();

        let result = consume_plan_stream(stream::iter(items), |plan| view.update(plan)).await;
        assert_eq!(view.plan().len(), 1);

        assert!(matches!(result, Err(ClientError::Stream(_))));
        view.settle(result);

        assert_eq!(view.error(), Some(GENERATE_ERROR_MESSAGE));
        assert!(view.plan().is_empty());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_plan_view_lifecycle() {
        let mut view = PlanView::Failed("old".to_string());
        view.begin();
        assert!(view.is_loading());
        assert!(view.error().is_none());

        let plan = parse_plan("Day 1:\n• A");
        view.settle(Ok(plan.clone()));
        assert_eq!(view, PlanView::Ready(plan));
    }

    #[test]
    fn test_session_reassembles_code_point_split_across_chunks() {
        let bytes = "Day 1:\n• A".as_bytes();
        // split inside the three-byte bullet
        let split = "Day 1:\n".len() + 1;
        let mut session = PlanSession::new();

        session.push_chunk(&bytes[..split]);
        assert_eq!(session.text(), "Day 1:\n");
        assert!(session.plan()[0].exercises.is_empty());

        let plan = session.push_chunk(&bytes[split..]);
        assert_eq!(plan[0].exercises[0].text, "• A");
    }

    #[test]
    fn test_session_replaces_invalid_bytes_and_keeps_going() {
        let mut session = PlanSession::new();
        session.push_chunk(b"Day 1:\n\xFF\n");
        session.push_chunk("• A".as_bytes());
        assert_eq!(session.text(), "Day 1:\n\u{FFFD}\n• A");
        assert_eq!(session.plan()[0].exercises.len(), 1);
    }

    #[test]
    fn test_finish_flushes_dangling_bytes() {
        let mut session = PlanSession::new();
        session.push_chunk(b"Day 1:\n\xE2\x80");
        let plan = session.finish();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].title, "Day 1:");
    }
}
