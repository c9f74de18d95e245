//! Link card for one retrieved source.

use leptos::prelude::*;

use crate::conversation::source_label;
use crate::ui::components::{ExternalLinkIcon, LinkIcon};

/// Source link labelled with the URL's host.
///
/// Opens in a new browsing context without an opener or referrer. URLs that
/// do not parse are shown verbatim.
#[component]
pub fn SourceCard(
    /// Source URL as received from the backend.
    url: String,
) -> impl IntoView {
    let label = source_label(&url);

    view! {
        <a
            href=url
            target="_blank"
            rel="noopener noreferrer"
            class="source-card group flex items-center gap-2 px-3 py-2 rounded-lg border border-panelBorder bg-panel hover:bg-panelBorder transition-colors"
        >
            <span class="w-6 h-6 rounded bg-brand flex items-center justify-center shrink-0">
                <LinkIcon class="w-3 h-3 text-white" />
            </span>
            <span class="source-host text-sm text-textSecondary group-hover:text-textPrimary truncate">
                {label}
            </span>
            <ExternalLinkIcon class="w-4 h-4 text-textMuted shrink-0 ml-auto" />
        </a>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::render;

    #[test]
    fn test_card_shows_host_without_www() {
        let html = render(|| {
            view! { <SourceCard url="https://www.law.cornell.edu/wex/adverse_possession?x=1".to_string() /> }
        });
        assert!(html.contains(">law.cornell.edu</span>"));
        assert!(html.contains("href=\"https://www.law.cornell.edu/wex/adverse_possession?x=1\""));
        assert!(html.contains("target=\"_blank\""));
        assert!(html.contains("rel=\"noopener noreferrer\""));
    }

    #[test]
    fn test_card_shows_unparsable_url_verbatim() {
        let html = render(|| view! { <SourceCard url="not a url".to_string() /> });
        assert!(html.contains(">not a url</span>"));
    }
}
