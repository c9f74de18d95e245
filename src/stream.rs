//! Research stream events and their Server-Sent Events framing.
//!
//! The research backend answers a question with a `text/event-stream` whose
//! frames each carry one JSON object tagged by `type`:
//!
//! - `checkpoint`: conversation thread id to send with follow-up questions
//! - `content`: a fragment of the answer text
//! - `search_start` / `search_results` / `search_error`: retrieval progress
//! - `end`: the answer is complete
//!
//! [`SseDecoder`] turns raw bytes into [`ResearchEvent`]s. It is lenient in
//! the same places the backend is sloppy: `\'` escapes are tolerated, and
//! frames it cannot understand are logged and skipped.
//!
//! # Example
//!
//! ```rust
//! use lexai::stream::{ResearchEvent, SseDecoder};
//!
//! let mut decoder = SseDecoder::default();
//! let events = decoder.push(b"data: {\"type\": \"content\", \"content\": \"Hi\"}\n\n");
//! assert_eq!(events, vec![ResearchEvent::Content { content: "Hi".to_string() }]);
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// One event of a research stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResearchEvent {
    /// Thread id assigned by the backend for a new conversation.
    Checkpoint {
        /// Id to pass back with later questions.
        checkpoint_id: String,
    },

    /// Incremental answer text.
    Content {
        /// Text fragment to append.
        content: String,
    },

    /// The model decided to search.
    SearchStart {
        /// Query sent to the search tool.
        #[serde(default)]
        query: String,
    },

    /// The search returned source URLs.
    SearchResults {
        /// Result URLs, in ranking order.
        #[serde(default, deserialize_with = "urls_from_array_or_string")]
        urls: Vec<String>,
    },

    /// The search failed.
    SearchError {
        /// Error description from the backend.
        #[serde(default)]
        error: String,
    },

    /// The answer is complete.
    End,
}

/// `urls` arrives either as an array or as a string holding a JSON array.
fn urls_from_array_or_string<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Urls {
        List(Vec<String>),
        Encoded(String),
    }

    match Urls::deserialize(deserializer)? {
        Urls::List(urls) => Ok(urls),
        Urls::Encoded(raw) => serde_json::from_str(&raw).map_err(serde::de::Error::custom),
    }
}

/// Encode an event as one SSE frame.
pub fn sse_frame(event: &ResearchEvent) -> String {
    let json = serde_json::to_string(event).unwrap_or_else(|e| {
        serde_json::json!({ "type": "search_error", "error": e.to_string() }).to_string()
    });

    format!("data: {json}\n\n")
}

/// Decode the payload of one `data:` field.
///
/// Returns `None` (after logging) for payloads that are not valid JSON even
/// after unescaping `\'`, and for unknown event types.
pub fn decode_data(data: &str) -> Option<ResearchEvent> {
    let data = data.trim();
    if data.is_empty() {
        return None;
    }

    let value: serde_json::Value = match serde_json::from_str(data) {
        Ok(value) => value,
        Err(first) => match serde_json::from_str(&data.replace("\\'", "'")) {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    name: "research.frame.malformed",
                    error = %first,
                    payload_len = data.len(),
                    "Skipping malformed research frame"
                );
                return None;
            }
        },
    };

    match serde_json::from_value(value) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(
                name: "research.frame.unknown",
                error = %e,
                "Skipping unrecognised research event"
            );
            None
        }
    }
}

/// Decode one complete SSE frame (the text between blank lines).
///
/// Multiple `data:` lines are joined with newlines as the SSE format
/// requires; comment lines and other fields are ignored.
pub fn decode_frame(frame: &str) -> Option<ResearchEvent> {
    let mut data: Option<String> = None;

    for line in frame.lines() {
        let Some(value) = line.strip_prefix("data:") else {
            continue;
        };
        let value = value.strip_prefix(' ').unwrap_or(value);
        match data.as_mut() {
            Some(buf) => {
                buf.push('\n');
                buf.push_str(value);
            }
            None => data = Some(value.to_string()),
        }
    }

    data.as_deref().and_then(decode_data)
}

/// Incremental SSE decoder over arbitrary byte chunks.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    /// Feed a chunk and return every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<ResearchEvent> {
        self.buf.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        while let Some(pos) = find_double_newline(&self.buf) {
            let frame = self.buf.drain(..pos + 2).collect::<Vec<_>>();
            events.extend(decode_frame(&String::from_utf8_lossy(&frame)));
        }
        events
    }

    /// Flush a trailing frame that was not terminated by a blank line.
    pub fn finish(&mut self) -> Vec<ResearchEvent> {
        let rest = std::mem::take(&mut self.buf);
        decode_frame(&String::from_utf8_lossy(&rest))
            .into_iter()
            .collect()
    }
}

/// Find the position of a double newline in the buffer.
fn find_double_newline(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\n\n")
}
