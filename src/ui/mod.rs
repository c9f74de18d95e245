//! Server-rendered chat views.
//!
//! Components are Leptos functions rendered to HTML strings on the server;
//! HTMX swaps the fragments in the browser.
//!
//! # Structure
//!
//! - [`chat`]: chat view components
//! - [`components`]: shared button and icon primitives
//! - [`page`]: the full HTML document

use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;
use serde::Serialize;

use crate::conversation::{Message, Session};

pub mod chat;
pub mod components;
pub mod page;

use chat::{InputBar, MessageFeed};
use page::ChatPage;

/// Product name shown in the header and next to replies.
pub const BRAND: &str = "LexAI";

/// Immutable view state for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    /// Session the page belongs to.
    pub session_id: String,
    /// Messages in display order.
    pub messages: Vec<Message>,
    /// Current input text.
    pub input: String,
    /// Whether a reply is still streaming.
    pub streaming: bool,
    /// Poll period of the feed while streaming.
    pub poll_interval_ms: u64,
}

impl ChatSnapshot {
    /// Capture the current state of `session`.
    pub fn capture(session: &Session, poll_interval_ms: u64) -> Self {
        let conversation = session.snapshot();
        Self {
            session_id: session.id().to_string(),
            messages: conversation.messages().to_vec(),
            input: conversation.input().to_string(),
            streaming: conversation.is_streaming(),
            poll_interval_ms,
        }
    }
}

/// Render a view tree to an HTML string.
///
/// Runs under a fresh reactive owner so callbacks created while rendering
/// are released afterwards.
pub fn render<F, V>(view: F) -> String
where
    F: FnOnce() -> V,
    V: IntoView,
{
    let owner = Owner::new();
    owner.with(|| view().into_view().to_html())
}

/// Input bar callbacks for server-rendered pages.
///
/// Pages are not hydrated, so no `on:` handler reaches the browser; edits and
/// submits travel as the `POST /api/chat` form instead.
fn inert_callbacks() -> (Callback<String>, Callback<()>) {
    (Callback::new(|_: String| {}), Callback::new(|()| {}))
}

/// Full chat page.
pub fn render_page(snapshot: ChatSnapshot) -> String {
    render(move || {
        let (on_change, on_submit) = inert_callbacks();
        view! { <ChatPage snapshot=snapshot on_change=on_change on_submit=on_submit /> }
    })
}

/// Message feed fragment, the HTMX polling target.
pub fn render_feed(snapshot: ChatSnapshot) -> String {
    render(move || {
        view! {
            <MessageFeed
                session_id=snapshot.session_id
                messages=snapshot.messages
                streaming=snapshot.streaming
                poll_interval_ms=snapshot.poll_interval_ms
            />
        }
    })
}

/// Answer to a submit: the new feed plus the cleared input bar, swapped in
/// out of band.
pub fn render_submit_response(snapshot: ChatSnapshot) -> String {
    let bar = render({
        let snapshot = snapshot.clone();
        move || {
            let (on_change, on_submit) = inert_callbacks();
            view! {
                <InputBar
                    value=snapshot.input
                    on_change=on_change
                    on_submit=on_submit
                    session_id=snapshot.session_id
                    oob=true
                />
            }
        }
    });

    let mut html = render_feed(snapshot);
    html.push_str(&bar);
    html
}
