//! Chat message list component.

use leptos::prelude::*;

use super::{SearchProgress, TypingIndicator};
use crate::conversation::Message;
use crate::ui::BRAND;
use crate::ui::components::ScalesIcon;

/// Text shown for a finished reply that carries no content yet.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "Preparing response...";

/// What the content region of an assistant message shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantBody<'a> {
    /// Typing indicator; loading beats content.
    Typing,
    /// Placeholder for an empty, finished reply.
    Placeholder,
    /// The reply text, whitespace preserved.
    Text(&'a str),
}

impl<'a> AssistantBody<'a> {
    /// Pick the body for `message`.
    pub fn of(message: &'a Message) -> Self {
        if message.is_loading {
            Self::Typing
        } else if message.content.is_empty() {
            Self::Placeholder
        } else {
            Self::Text(&message.content)
        }
    }
}

/// Ordered list of chat turns, newest last.
#[component]
pub fn MessageList(
    /// Messages in display order.
    messages: Vec<Message>,
) -> impl IntoView {
    let items = messages
        .into_iter()
        .map(|message| view! { <MessageItem message=message /> })
        .collect_view();

    view! {
        <div class="message-list max-w-3xl mx-auto px-4 py-6" aria-live="polite" aria-label="Chat messages">
            {items}
        </div>
    }
}

/// One chat turn.
#[component]
fn MessageItem(message: Message) -> impl IntoView {
    if message.is_user {
        return view! {
            <div class="message message-user mb-6 flex justify-end" data-message-id=message.id.to_string()>
                <div class="max-w-[80%] rounded-2xl rounded-br-md px-4 py-3 bg-panel text-textPrimary whitespace-pre-wrap">
                    {message.content}
                </div>
            </div>
        }
        .into_any();
    }

    let body = match AssistantBody::of(&message) {
        AssistantBody::Typing => view! { <TypingIndicator /> }.into_any(),
        AssistantBody::Placeholder => {
            view! { <span class="text-textMuted italic">{EMPTY_REPLY_PLACEHOLDER}</span> }.into_any()
        }
        AssistantBody::Text(text) => text.to_string().into_any(),
    };

    let progress = message
        .search_info
        .filter(|info| !info.stages.is_empty())
        .map(|info| view! { <SearchProgress info=info /> });

    view! {
        <div class="message message-assistant mb-6 space-y-3" data-message-id=message.id.to_string()>
            <div class="flex items-center gap-2">
                <div class="w-6 h-6 rounded-lg bg-brand flex items-center justify-center">
                    <ScalesIcon class="w-4 h-4 text-white" />
                </div>
                <span class="text-sm font-medium text-textSecondary">{BRAND}</span>
            </div>
            {progress}
            <div class="message-content pl-8 leading-relaxed text-textPrimary whitespace-pre-wrap">
                {body}
            </div>
        </div>
    }
    .into_any()
}
