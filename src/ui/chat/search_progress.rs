//! Inline search progress for an assistant reply.

use leptos::prelude::*;

use super::SourceCard;
use crate::conversation::{SearchInfo, Stage};
use crate::ui::components::{AlertCircleIcon, CheckCircleIcon, Spinner};

/// Most source cards shown under "Found N sources".
pub const MAX_SOURCE_CARDS: usize = 4;

/// The indicator blocks a [`SearchInfo`] turns into.
///
/// Blocks always render in field order. Stage tags without a block of their
/// own (`writing`, unknown tags) contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressBlocks {
    /// Query for the in-progress indicator.
    pub searching: Option<String>,
    /// Source summary, present only when reading with at least one URL.
    pub sources: Option<SourceList>,
    /// Whether the error indicator shows.
    pub error: bool,
}

/// Sources to list under the "Found N sources" line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceList {
    /// Number of URLs found, not just those shown.
    pub total: usize,
    /// URLs to render as cards, in backend order.
    pub shown: Vec<String>,
}

impl ProgressBlocks {
    /// Decide which blocks `info` shows.
    pub fn from_info(info: &SearchInfo) -> Self {
        let searching = info
            .has(&Stage::Searching)
            .then(|| info.query.clone());

        let sources = (info.has(&Stage::Reading) && !info.urls.is_empty()).then(|| SourceList {
            total: info.urls.len(),
            shown: info.urls.iter().take(MAX_SOURCE_CARDS).cloned().collect(),
        });

        Self {
            searching,
            sources,
            error: info.has(&Stage::Error),
        }
    }

    /// Whether no block shows.
    pub fn is_empty(&self) -> bool {
        self.searching.is_none() && self.sources.is_none() && !self.error
    }
}

/// Search stage indicators: searching, found sources, error.
///
/// Renders nothing when no stage has an indicator.
#[component]
pub fn SearchProgress(
    /// Search state of the reply.
    info: SearchInfo,
) -> impl IntoView {
    let blocks = ProgressBlocks::from_info(&info);
    if blocks.is_empty() {
        return ().into_any();
    }

    let searching = blocks.searching.map(|query| {
        let text = format!("Searching legal sources for \"{query}\"");
        view! {
            <div class="search-searching flex items-center gap-2 text-sm text-textSecondary">
                <Spinner />
                <span>{text}</span>
            </div>
        }
    });

    let sources = blocks.sources.map(|list| {
        let found = format!("Found {} sources", list.total);
        let cards = list
            .shown
            .into_iter()
            .map(|url| view! { <SourceCard url=url /> })
            .collect_view();
        view! {
            <div class="search-sources space-y-2">
                <div class="flex items-center gap-2 text-sm text-textMuted">
                    <CheckCircleIcon class="text-primary" />
                    <span>{found}</span>
                </div>
                <div class="flex flex-wrap gap-2">{cards}</div>
            </div>
        }
    });

    let error = blocks.error.then(|| {
        view! {
            <div class="search-error flex items-center gap-2 text-sm text-danger">
                <AlertCircleIcon />
                <span>"Search encountered an error"</span>
            </div>
        }
    });

    view! {
        <div class="search-progress mb-4 space-y-3">
            {searching}
            {sources}
            {error}
        </div>
    }
    .into_any()
}
