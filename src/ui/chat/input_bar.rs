//! Controlled chat input bar.
//!
//! The bar never owns its text: it renders the `value` it is given and
//! reports every change and every submit to its parent. The keyboard and
//! submit rules live in [`InputBarEvents`] so they can be exercised without
//! a DOM.

use leptos::prelude::*;

use crate::conversation::can_submit;
use crate::ui::components::{
    BookIcon, Button, ButtonSize, ButtonVariant, PaperclipIcon, SendIcon,
};

/// Placeholder of the message field.
pub const INPUT_PLACEHOLDER: &str = "Ask about case law, statutes, legal concepts...";

/// What a key press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Submit was forwarded; the default action (newline) must be suppressed.
    Submitted,
    /// The key is left to the text field.
    PassThrough,
}

/// Routes input bar DOM events to the parent's callbacks.
#[derive(Clone, Copy)]
pub struct InputBarEvents<C, S> {
    on_change: C,
    on_submit: S,
}

impl<C, S> std::fmt::Debug for InputBarEvents<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBarEvents").finish_non_exhaustive()
    }
}

impl<C, S> InputBarEvents<C, S>
where
    C: Fn(String),
    S: Fn(),
{
    /// Wrap the parent's change and submit callbacks.
    pub fn new(on_change: C, on_submit: S) -> Self {
        Self {
            on_change,
            on_submit,
        }
    }

    /// The field's value changed to `value`.
    pub fn input(&self, value: String) {
        (self.on_change)(value);
    }

    /// A key went down in the field.
    ///
    /// Enter without shift submits; everything else, Shift+Enter included,
    /// passes through.
    pub fn key_down(&self, key: &str, shift: bool) -> KeyOutcome {
        if key == "Enter" && !shift {
            (self.on_submit)();
            KeyOutcome::Submitted
        } else {
            KeyOutcome::PassThrough
        }
    }

    /// The form was submitted.
    pub fn submit(&self) {
        (self.on_submit)();
    }
}

/// Message field with attachment, focus and send controls.
///
/// The send button is disabled while the trimmed `value` is empty. Without
/// client-side hydration the form posts to `/api/chat` through HTMX and
/// `/static/input_bar.js` applies the same keyboard rule.
#[component]
pub fn InputBar(
    /// Current text, owned by the parent.
    #[prop(into)]
    value: String,
    /// Receives the field's full new value on every keystroke.
    on_change: Callback<String>,
    /// Receives submit requests.
    on_submit: Callback<()>,
    /// Session the form posts to.
    #[prop(into)]
    session_id: String,
    /// Render as an HTMX out-of-band swap.
    #[prop(default = false)]
    oob: bool,
) -> impl IntoView {
    let events = InputBarEvents::new(
        move |text: String| on_change.run(text),
        move || on_submit.run(()),
    );
    let send_disabled = !can_submit(&value);

    view! {
        <div id="input-bar" class="p-4 bg-background border-t border-panelBorder" hx-swap-oob=oob.then_some("true")>
            <form
                class="max-w-3xl mx-auto"
                action="/api/chat"
                method="post"
                hx-post="/api/chat"
                hx-target="#chat-feed"
                hx-swap="outerHTML"
                data-input-bar="true"
                on:submit=move |ev| {
                    ev.prevent_default();
                    events.submit();
                }
            >
                <input type="hidden" name="session_id" value=session_id />

                <div class="relative flex items-center">
                    <div class="flex-1 flex items-center rounded-2xl px-4 py-3 bg-panel border border-panelBorder focus-within:border-primary transition-all">
                        <Button variant=ButtonVariant::Ghost size=ButtonSize::IconSm label="Attach file" class="mr-2">
                            <PaperclipIcon class="w-5 h-5" />
                        </Button>

                        <textarea
                            name="message"
                            rows="1"
                            placeholder=INPUT_PLACEHOLDER
                            class="flex-1 bg-transparent text-textPrimary placeholder:text-textMuted resize-none focus:outline-none text-base"
                            on:input=move |ev| events.input(event_target_value(&ev))
                            on:keydown=move |ev| {
                                if events.key_down(&ev.key(), ev.shift_key()) == KeyOutcome::Submitted {
                                    ev.prevent_default();
                                }
                            }
                        >
                            {value}
                        </textarea>

                        <Button variant=ButtonVariant::Ghost size=ButtonSize::IconSm label="Focus sources" class="ml-2">
                            <BookIcon class="w-5 h-5" />
                        </Button>
                    </div>

                    <Button
                        variant=ButtonVariant::Primary
                        button_type="submit"
                        disabled=send_disabled
                        label="Send"
                        class="ml-3"
                    >
                        <SendIcon class="w-5 h-5" />
                    </Button>
                </div>

                <div class="flex items-center justify-center gap-4 mt-3 text-xs text-textMuted">
                    <span class="flex items-center gap-1">
                        <kbd class="px-1.5 py-0.5 rounded bg-panel font-mono">"Enter"</kbd>
                        " to send, Shift+Enter for a new line"
                    </span>
                    <span>"•"</span>
                    <span>"Legal research assistance only - consult an attorney for legal advice"</span>
                </div>
            </form>
        </div>
    }
}
