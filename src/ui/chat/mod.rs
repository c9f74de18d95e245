//! Chat view components.
//!
//! Every component is a pure function of its props. State lives in
//! [`Conversation`](crate::conversation::Conversation); the only upward flow
//! is the input bar's change and submit callbacks.

mod header;
mod input_bar;
mod message_list;
mod search_progress;
mod shell;
mod source_card;
mod typing_indicator;

pub use header::ChatHeader;
pub use input_bar::{INPUT_PLACEHOLDER, InputBar, InputBarEvents, KeyOutcome};
pub use message_list::{AssistantBody, EMPTY_REPLY_PLACEHOLDER, MessageList};
pub use search_progress::{MAX_SOURCE_CARDS, ProgressBlocks, SearchProgress, SourceList};
pub use shell::{ChatShell, MessageFeed};
pub use source_card::SourceCard;
pub use typing_indicator::TypingIndicator;
