//! Full HTML document for the chat page.

use leptos::prelude::*;

use crate::ui::chat::ChatShell;
use crate::ui::{BRAND, ChatSnapshot};

/// Complete chat document.
///
/// Scripts are served locally from `/static`; nothing loads from a CDN.
#[component]
pub fn ChatPage(
    /// State to render.
    snapshot: ChatSnapshot,
    /// Input change callback.
    on_change: Callback<String>,
    /// Submit callback.
    on_submit: Callback<()>,
) -> impl IntoView {
    let title = format!("{BRAND} - Legal Research");

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <meta name="description" content="Legal research assistant" />
                <title>{title}</title>

                <script src="/static/vendor/htmx.min.js"></script>
                <script defer src="/static/input_bar.js"></script>
                <link rel="stylesheet" href="/static/app.css" />
            </head>

            <body class="min-h-screen bg-background text-textPrimary antialiased">
                <ChatShell snapshot=snapshot on_change=on_change on_submit=on_submit />
            </body>
        </html>
    }
}
