//! Research backend transport.
//!
//! The backend runs the model and its search tool; this module only asks it
//! a question and relays the resulting [`ResearchEvent`]s into a session's
//! [`Conversation`](crate::conversation::Conversation).

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use reqwest::header::ACCEPT;
use tracing::{debug, info, warn};
use url::Url;

use crate::conversation::{PendingReply, Session};
use crate::error::{Error, Result};
use crate::stream::{ResearchEvent, SseDecoder};

/// Boxed stream of research events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ResearchEvent>> + Send>>;

/// Source of research answers.
#[async_trait::async_trait]
pub trait ResearchBackend: Send + Sync + std::fmt::Debug {
    /// Ask `query`, continuing the backend thread `checkpoint_id` if given.
    async fn stream(&self, query: &str, checkpoint_id: Option<&str>) -> Result<EventStream>;
}

/// Backend reached over HTTP at `{base_url}/chat_stream/{query}`.
#[derive(Clone)]
pub struct HttpResearchBackend {
    http: reqwest::Client,
    base_url: Url,
    idle_timeout: Duration,
}

impl std::fmt::Debug for HttpResearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResearchBackend")
            .field("base_url", &self.base_url.as_str())
            .field("idle_timeout", &self.idle_timeout)
            .finish()
    }
}

impl HttpResearchBackend {
    /// Create a backend client.
    ///
    /// `idle_timeout` bounds both connecting and the silence between two
    /// chunks of a running stream.
    pub fn new(base_url: &str, idle_timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(idle_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            idle_timeout,
        })
    }

    /// URL of the stream for `query`.
    ///
    /// The query travels as a single percent-encoded path segment.
    pub fn stream_url(&self, query: &str, checkpoint_id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("chat_stream")
            .push(query);
        if let Some(id) = checkpoint_id {
            url.query_pairs_mut().append_pair("checkpoint_id", id);
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl ResearchBackend for HttpResearchBackend {
    async fn stream(&self, query: &str, checkpoint_id: Option<&str>) -> Result<EventStream> {
        let url = self.stream_url(query, checkpoint_id)?;
        debug!(url = %url, "Opening research stream");

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let byte_stream = resp.bytes_stream();
        let idle_timeout = self.idle_timeout;

        let out = async_stream::try_stream! {
            let mut decoder = SseDecoder::default();

            futures::pin_mut!(byte_stream);
            loop {
                let next = tokio::time::timeout(idle_timeout, byte_stream.next())
                    .await
                    .map_err(|_elapsed| Error::IdleTimeout(idle_timeout))?;
                let Some(chunk) = next else {
                    break;
                };
                let chunk = chunk.map_err(Error::from)?;

                for event in decoder.push(&chunk) {
                    yield event;
                }
            }

            for event in decoder.finish() {
                yield event;
            }
        };

        Ok(Box::pin(out))
    }
}

/// Stream the answer for `reply` into `session`.
///
/// Runs until the backend sends `end`. A failed request, a broken stream, or
/// a stream that closes without `end` marks the reply as failed.
pub async fn relay(backend: Arc<dyn ResearchBackend>, session: Session, reply: PendingReply) {
    let reply_id = reply.reply_id;

    let outcome: Result<()> = async {
        let mut events = backend
            .stream(&reply.query, reply.checkpoint_id.as_deref())
            .await?;

        while let Some(event) = events.next().await {
            let event = event?;
            let finished = matches!(event, ResearchEvent::End);
            session.update(|c| c.apply(reply_id, event));
            if finished {
                return Ok(());
            }
        }

        Err(Error::StreamEnded)
    }
    .await;

    match outcome {
        Ok(()) => info!(
            name: "research.stream.completed",
            session_id = %session.id(),
            reply_id,
            "Research reply completed"
        ),
        Err(e) => {
            warn!(
                name: "research.stream.failed",
                session_id = %session.id(),
                reply_id,
                error = %e,
                "Research reply failed"
            );
            session.update(|c| c.fail(reply_id));
        }
    }
}
