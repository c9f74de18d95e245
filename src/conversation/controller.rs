//! The conversation controller: single owner of view state.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use super::model::{Message, MessageId, SearchInfo, Stage, can_submit};
use crate::stream::ResearchEvent;

/// Content shown when a reply failed before producing any text.
pub const TRANSPORT_ERROR_REPLY: &str = "Sorry, there was an error processing your request.";

/// A reply the transport has to fetch after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    /// Assistant message that receives the stream.
    pub reply_id: MessageId,
    /// Text the user sent, untrimmed.
    pub query: String,
    /// Backend thread to continue, if one was assigned.
    pub checkpoint_id: Option<String>,
}

/// State of one chat conversation.
///
/// Views receive snapshots of this state; the only ways in are
/// [`Conversation::set_input`], [`Conversation::submit`] and the stream
/// folding methods.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    messages: Vec<Message>,
    input: String,
    checkpoint_id: Option<String>,
    open_replies: BTreeSet<MessageId>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation from existing messages.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current text of the input bar.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Backend thread id, once the backend assigned one.
    pub fn checkpoint_id(&self) -> Option<&str> {
        self.checkpoint_id.as_deref()
    }

    /// Whether any reply is still streaming.
    pub fn is_streaming(&self) -> bool {
        !self.open_replies.is_empty()
    }

    /// Replace the input text with the field's full new value.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send the current input.
    ///
    /// Blank input is ignored. Otherwise the user message and a loading
    /// assistant placeholder are appended, the input is cleared, and the
    /// reply the transport should fetch is returned.
    pub fn submit(&mut self) -> Option<PendingReply> {
        if !can_submit(&self.input) {
            return None;
        }

        let query = std::mem::take(&mut self.input);
        let user_id = self.next_id();
        let reply_id = user_id + 1;

        self.messages.push(Message::user(user_id, query.clone()));
        self.messages.push(Message::assistant_pending(reply_id));
        self.open_replies.insert(reply_id);

        Some(PendingReply {
            reply_id,
            query,
            checkpoint_id: self.checkpoint_id.clone(),
        })
    }

    /// Fold one research event into the reply `reply_id`.
    pub fn apply(&mut self, reply_id: MessageId, event: ResearchEvent) {
        match event {
            ResearchEvent::Checkpoint { checkpoint_id } => {
                debug!(checkpoint_id = %checkpoint_id, "Backend thread assigned");
                self.checkpoint_id = Some(checkpoint_id);
            }
            ResearchEvent::Content { content } => self.update_reply(reply_id, |reply| {
                reply.content.push_str(&content);
                reply.is_loading = false;
            }),
            ResearchEvent::SearchStart { query } => self.update_reply(reply_id, |reply| {
                reply.search_info = Some(SearchInfo::searching(query));
                reply.is_loading = false;
            }),
            ResearchEvent::SearchResults { urls } => self.update_reply(reply_id, |reply| {
                let info = reply.search_info.get_or_insert_with(SearchInfo::default);
                info.push_stage(Stage::Reading);
                info.urls = urls;
                reply.is_loading = false;
            }),
            ResearchEvent::SearchError { error } => {
                warn!(name: "research.search.failed", reply_id, error = %error, "Search failed");
                self.update_reply(reply_id, |reply| {
                    reply
                        .search_info
                        .get_or_insert_with(SearchInfo::default)
                        .push_stage(Stage::Error);
                    reply.is_loading = false;
                });
            }
            ResearchEvent::End => {
                self.open_replies.remove(&reply_id);
                self.update_reply(reply_id, |reply| {
                    if let Some(info) = reply
                        .search_info
                        .as_mut()
                        .filter(|info| !info.stages.is_empty())
                    {
                        info.push_stage(Stage::Writing);
                    }
                    reply.is_loading = false;
                });
            }
        }
    }

    /// The transport for `reply_id` failed or closed early.
    ///
    /// Text that already streamed is kept; an empty reply gets
    /// [`TRANSPORT_ERROR_REPLY`].
    pub fn fail(&mut self, reply_id: MessageId) {
        self.open_replies.remove(&reply_id);
        self.update_reply(reply_id, |reply| {
            if reply.content.is_empty() {
                reply.content = TRANSPORT_ERROR_REPLY.to_string();
            }
            reply.is_loading = false;
        });
    }

    fn next_id(&self) -> MessageId {
        self.messages
            .iter()
            .map(|m| m.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    fn update_reply(&mut self, reply_id: MessageId, f: impl FnOnce(&mut Message)) {
        match self
            .messages
            .iter_mut()
            .find(|m| m.id == reply_id && !m.is_user)
        {
            Some(reply) => f(reply),
            None => warn!(reply_id, "Event for unknown reply ignored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(text: &str) -> (Conversation, PendingReply) {
        let mut conversation = Conversation::new();
        conversation.set_input(text);
        let pending = conversation.submit().expect("non-blank input submits");
        (conversation, pending)
    }

    #[test]
    fn test_submit_appends_user_and_placeholder() {
        let (conversation, pending) = submitted("What is adverse possession?");

        assert_eq!(conversation.input(), "");
        assert!(conversation.is_streaming());
        assert_eq!(pending.reply_id, 2);
        assert_eq!(pending.query, "What is adverse possession?");
        assert_eq!(pending.checkpoint_id, None);

        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::user(1, "What is adverse possession?"));
        assert_eq!(messages[1], Message::assistant_pending(2));
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut conversation = Conversation::new();
        conversation.set_input("   \n");
        assert_eq!(conversation.submit(), None);
        assert!(conversation.messages().is_empty());
        assert_eq!(conversation.input(), "   \n");
    }

    #[test]
    fn test_ids_continue_after_highest() {
        let mut conversation = Conversation::from_messages(vec![
            Message::user(7, "earlier"),
            Message::assistant(3, "reply"),
        ]);
        conversation.set_input("next");
        let pending = conversation.submit().unwrap();
        assert_eq!(pending.reply_id, 9);
        assert_eq!(conversation.messages()[2].id, 8);
    }

    #[test]
    fn test_search_lifecycle() {
        let (mut conversation, pending) = submitted("adverse possession elements");
        let id = pending.reply_id;

        conversation.apply(
            id,
            ResearchEvent::SearchStart {
                query: "adverse possession".to_string(),
            },
        );
        let reply = &conversation.messages()[1];
        assert!(!reply.is_loading);
        assert_eq!(
            reply.search_info,
            Some(SearchInfo::searching("adverse possession"))
        );

        conversation.apply(
            id,
            ResearchEvent::SearchResults {
                urls: vec!["https://a.example".to_string()],
            },
        );
        conversation.apply(
            id,
            ResearchEvent::Content {
                content: "Adverse possession ".to_string(),
            },
        );
        conversation.apply(
            id,
            ResearchEvent::Content {
                content: "requires...".to_string(),
            },
        );
        conversation.apply(id, ResearchEvent::End);

        let reply = &conversation.messages()[1];
        let info = reply.search_info.as_ref().unwrap();
        assert_eq!(
            info.stages,
            vec![Stage::Searching, Stage::Reading, Stage::Writing]
        );
        assert_eq!(info.query, "adverse possession");
        assert_eq!(info.urls, vec!["https://a.example".to_string()]);
        assert_eq!(reply.content, "Adverse possession requires...");
        assert!(!conversation.is_streaming());
    }

    #[test]
    fn test_results_without_search_start() {
        let (mut conversation, pending) = submitted("q");
        conversation.apply(
            pending.reply_id,
            ResearchEvent::SearchResults {
                urls: vec!["https://a.example".to_string()],
            },
        );
        let info = conversation.messages()[1].search_info.clone().unwrap();
        assert_eq!(info.stages, vec![Stage::Reading]);
        assert_eq!(info.query, "");
    }

    #[test]
    fn test_end_without_search_adds_no_stage() {
        let (mut conversation, pending) = submitted("hello");
        conversation.apply(
            pending.reply_id,
            ResearchEvent::Content {
                content: "Hi.".to_string(),
            },
        );
        conversation.apply(pending.reply_id, ResearchEvent::End);
        let info = conversation.messages()[1].search_info.clone().unwrap();
        assert!(info.stages.is_empty());
    }

    #[test]
    fn test_search_error_keeps_earlier_stages() {
        let (mut conversation, pending) = submitted("q");
        conversation.apply(
            pending.reply_id,
            ResearchEvent::SearchStart {
                query: "q".to_string(),
            },
        );
        conversation.apply(
            pending.reply_id,
            ResearchEvent::SearchError {
                error: "rate limited".to_string(),
            },
        );
        let info = conversation.messages()[1].search_info.clone().unwrap();
        assert_eq!(info.stages, vec![Stage::Searching, Stage::Error]);
    }

    #[test]
    fn test_checkpoint_is_sent_with_next_question() {
        let (mut conversation, pending) = submitted("first");
        conversation.apply(
            pending.reply_id,
            ResearchEvent::Checkpoint {
                checkpoint_id: "thread-9".to_string(),
            },
        );
        conversation.apply(pending.reply_id, ResearchEvent::End);

        conversation.set_input("second");
        let next = conversation.submit().unwrap();
        assert_eq!(next.checkpoint_id.as_deref(), Some("thread-9"));
        assert_eq!(conversation.checkpoint_id(), Some("thread-9"));
    }

    #[test]
    fn test_fail_before_content_shows_error_reply() {
        let (mut conversation, pending) = submitted("q");
        conversation.fail(pending.reply_id);
        let reply = &conversation.messages()[1];
        assert_eq!(reply.content, TRANSPORT_ERROR_REPLY);
        assert!(!reply.is_loading);
        assert!(!conversation.is_streaming());
    }

    #[test]
    fn test_fail_after_content_keeps_text() {
        let (mut conversation, pending) = submitted("q");
        conversation.apply(
            pending.reply_id,
            ResearchEvent::Content {
                content: "Partial".to_string(),
            },
        );
        conversation.fail(pending.reply_id);
        assert_eq!(conversation.messages()[1].content, "Partial");
    }

    #[test]
    fn test_events_for_unknown_reply_are_ignored() {
        let (mut conversation, _) = submitted("q");
        let before = conversation.messages().to_vec();
        conversation.apply(
            99,
            ResearchEvent::Content {
                content: "stray".to_string(),
            },
        );
        conversation.apply(
            1,
            ResearchEvent::Content {
                content: "not a reply".to_string(),
            },
        );
        assert_eq!(conversation.messages(), before.as_slice());
    }
}
