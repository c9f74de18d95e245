//! Chat header component.

use leptos::prelude::*;

use crate::ui::BRAND;
use crate::ui::components::{Button, ButtonVariant, ScalesIcon, SettingsIcon};

/// Navigation entries as `(label, active)`.
const NAV_ITEMS: [(&str, bool); 3] = [("Home", false), ("Research", true), ("Library", false)];

/// Branding and navigation bar. Static: no props, no state.
#[component]
pub fn ChatHeader() -> impl IntoView {
    let nav = NAV_ITEMS
        .into_iter()
        .map(|(label, active)| {
            let class = if active {
                "px-4 py-2 text-sm rounded-lg text-textPrimary bg-panel"
            } else {
                "px-4 py-2 text-sm rounded-lg text-textMuted hover:text-textPrimary hover:bg-panel transition-colors"
            };
            let current = active.then_some("page");
            view! {
                <a href="#" class=class aria-current=current>
                    {label}
                </a>
            }
        })
        .collect_view();

    view! {
        <header class="flex items-center justify-between px-6 py-4 bg-background border-b border-panelBorder">
            <div class="flex items-center gap-2">
                <div class="w-8 h-8 rounded-lg bg-brand flex items-center justify-center">
                    <ScalesIcon class="w-5 h-5 text-white" />
                </div>
                <span class="text-xl font-semibold text-textPrimary">{BRAND}</span>
            </div>

            <nav class="flex items-center gap-1">{nav}</nav>

            <div class="flex items-center gap-2">
                <Button variant=ButtonVariant::Ghost label="Settings">
                    <SettingsIcon class="w-5 h-5" />
                </Button>
            </div>
        </header>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::render;

    #[test]
    fn test_header_shows_brand_and_nav() {
        let html = render(|| view! { <ChatHeader /> });
        assert!(html.contains(BRAND));
        assert!(html.contains(">Home</a>"));
        assert!(html.contains(">Library</a>"));
        let research = html.find(">Research</a>").unwrap();
        let current = html.find("aria-current=\"page\"").unwrap();
        let link_start = html[..research].rfind("<a ").unwrap();
        assert!(link_start < current && current < research);
        assert_eq!(html.matches("aria-current").count(), 1);
        assert!(html.contains("aria-label=\"Settings\""));
    }
}
