//! Typing indicator shown while a reply is loading.

use leptos::prelude::*;

/// Three bouncing dots, animated purely in CSS.
#[component]
pub fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="typing-indicator flex items-center gap-1 py-1" role="status" aria-label="Assistant is typing">
            <span class="w-2 h-2 bg-primary rounded-full animate-bounce" style="animation-delay: 0ms"></span>
            <span class="w-2 h-2 bg-primary rounded-full animate-bounce" style="animation-delay: 150ms"></span>
            <span class="w-2 h-2 bg-primary rounded-full animate-bounce" style="animation-delay: 300ms"></span>
        </div>
    }
}
