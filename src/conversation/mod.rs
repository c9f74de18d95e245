//! Conversation state behind the chat views.
//!
//! The views are pure functions of a snapshot; everything that changes over
//! time lives here.
//!
//! # Architecture
//!
//! - [`Message`], [`SearchInfo`], [`Stage`]: the display records
//! - [`Conversation`]: single owner of messages and input text, folding
//!   research stream events into the reply being streamed
//! - [`SessionStore`]: thread-safe map of sessions to conversations
//!
//! # Example
//!
//! ```rust
//! use lexai::conversation::Conversation;
//! use lexai::stream::ResearchEvent;
//!
//! let mut conversation = Conversation::new();
//! conversation.set_input("What is adverse possession?");
//! let pending = conversation.submit().unwrap();
//!
//! conversation.apply(pending.reply_id, ResearchEvent::Content { content: "It is...".into() });
//! conversation.apply(pending.reply_id, ResearchEvent::End);
//! assert_eq!(conversation.messages()[1].content, "It is...");
//! ```

mod controller;
mod model;
mod store;

pub use controller::{Conversation, PendingReply, TRANSPORT_ERROR_REPLY};
pub use model::{Message, MessageId, SearchInfo, Stage, can_submit, source_label};
pub use store::{Session, SessionStore};
