//! Chat shell layout component.

use leptos::prelude::*;

use super::{ChatHeader, InputBar, MessageList};
use crate::conversation::Message;
use crate::ui::ChatSnapshot;

/// Scrollable feed around the message list.
///
/// While a reply streams the feed polls its own fragment and replaces itself;
/// the first fragment rendered after the stream ends carries no trigger, so
/// polling stops.
#[component]
pub fn MessageFeed(
    /// Session whose messages are shown.
    #[prop(into)]
    session_id: String,
    /// Messages in display order.
    messages: Vec<Message>,
    /// Whether a reply is still streaming.
    #[prop(default = false)]
    streaming: bool,
    /// Poll period while streaming.
    #[prop(default = 750)]
    poll_interval_ms: u64,
) -> impl IntoView {
    let poll_url = streaming.then(|| format!("/api/sessions/{session_id}/messages"));
    let trigger = streaming.then(|| format!("every {poll_interval_ms}ms"));

    view! {
        <div
            id="chat-feed"
            class="flex-1 overflow-y-auto min-h-0 bg-background"
            hx-get=poll_url
            hx-trigger=trigger
            hx-swap="outerHTML"
        >
            <MessageList messages=messages />
        </div>
    }
}

/// Main chat shell: header, message feed, input bar.
///
/// # Example
///
/// ```rust,ignore
/// view! {
///     <ChatShell
///         snapshot=ChatSnapshot::capture(&session, 750)
///         on_change=Callback::new(move |text| session.update(|c| c.set_input(text)))
///         on_submit=on_submit
///     />
/// }
/// ```
#[component]
pub fn ChatShell(
    /// State to render.
    snapshot: ChatSnapshot,
    /// Input change callback, forwarded to the input bar.
    on_change: Callback<String>,
    /// Submit callback, forwarded to the input bar.
    on_submit: Callback<()>,
) -> impl IntoView {
    let ChatSnapshot {
        session_id,
        messages,
        input,
        streaming,
        poll_interval_ms,
    } = snapshot;

    view! {
        <div class="chat-shell flex flex-col h-screen overflow-hidden">
            <ChatHeader />

            <MessageFeed
                session_id=session_id.clone()
                messages=messages
                streaming=streaming
                poll_interval_ms=poll_interval_ms
            />

            <InputBar
                value=input
                on_change=on_change
                on_submit=on_submit
                session_id=session_id
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::render;

    #[test]
    fn test_feed_polls_only_while_streaming() {
        let html = render(|| {
            view! { <MessageFeed session_id="abc" messages=Vec::new() streaming=true poll_interval_ms=500 /> }
        });
        assert!(html.contains("hx-get=\"/api/sessions/abc/messages\""));
        assert!(html.contains("hx-trigger=\"every 500ms\""));

        let html = render(|| view! { <MessageFeed session_id="abc" messages=Vec::new() /> });
        assert!(!html.contains("hx-get"));
        assert!(!html.contains("hx-trigger"));
    }

    #[test]
    fn test_shell_orders_header_feed_input() {
        let snapshot = ChatSnapshot {
            session_id: "abc".to_string(),
            messages: vec![Message::user(1, "Define estoppel")],
            input: "draft".to_string(),
            streaming: false,
            poll_interval_ms: 750,
        };
        let html = render(move || {
            view! {
                <ChatShell
                    snapshot=snapshot
                    on_change=Callback::new(|_: String| {})
                    on_submit=Callback::new(|()| {})
                />
            }
        });
        let header = html.find("<header").unwrap();
        let feed = html.find("id=\"chat-feed\"").unwrap();
        let bar = html.find("id=\"input-bar\"").unwrap();
        assert!(header < feed && feed < bar);
        assert!(html.contains("Define estoppel"));
        assert!(html.contains(">draft</textarea>"));
    }
}
