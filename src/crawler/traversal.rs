//! Pagination traversal for one category
//!
//! Walks listing pages by following "next" links until a page has none
//! (`Exhausted`) or a listing fetch/parse fails (`Failed`). Records extracted
//! before a failure are kept either way.

use crate::catalog::{BookRecord, Category};
use crate::crawler::extractor::{Extraction, ItemExtractor};
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::parser::{parse_listing_page, CatalogSelectors, ParseError};
use crate::state::TraversalState;
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Why a category's traversal was abandoned
#[derive(Debug, Error)]
pub enum TraversalFailed {
    #[error("listing page fetch failed: {0}")]
    Fetch(#[source] FetchError),

    #[error("unreadable listing page {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },

    #[error("next-page link loops back to {url}")]
    Cycle { url: String },
}

/// How a category's traversal ended
#[derive(Debug)]
pub enum TraversalEnd {
    Exhausted,
    Failed(TraversalFailed),
}

impl TraversalEnd {
    /// The terminal state this end corresponds to
    pub fn state(&self) -> TraversalState {
        match self {
            Self::Exhausted => TraversalState::Exhausted,
            Self::Failed(_) => TraversalState::Failed,
        }
    }
}

/// Everything one category traversal produced
#[derive(Debug)]
pub struct TraversalOutcome {
    /// Extracted records in page-then-in-page order
    pub records: Vec<BookRecord>,

    /// Listing pages successfully parsed
    pub pages: usize,

    /// Items skipped by the extractor
    pub skipped: usize,

    pub end: TraversalEnd,
}

/// Drives pagination for one category at a time
pub struct PageTraversal<'a> {
    fetcher: &'a Fetcher,
    selectors: &'a CatalogSelectors,
    extractor: &'a ItemExtractor<'a>,
}

impl<'a> PageTraversal<'a> {
    pub fn new(
        fetcher: &'a Fetcher,
        selectors: &'a CatalogSelectors,
        extractor: &'a ItemExtractor<'a>,
    ) -> Self {
        Self {
            fetcher,
            selectors,
            extractor,
        }
    }

    /// Traverses every listing page of a category
    pub async fn run(&self, category: &Category) -> TraversalOutcome {
        let mut records = Vec::new();
        let mut pages = 0;
        let mut skipped = 0;
        let mut visited: HashSet<Url> = HashSet::new();

        let mut state = TraversalState::Fetching;
        let mut current = category.url.clone();

        let end = loop {
            debug_assert_eq!(state, TraversalState::Fetching);
            visited.insert(current.clone());
            tracing::debug!("[{}] fetching listing page {}", category.name, current);

            let body = match self.fetcher.fetch(&current).await {
                Ok(body) => body,
                Err(e) => break TraversalEnd::Failed(TraversalFailed::Fetch(e)),
            };

            let page = match parse_listing_page(&current, &body, self.selectors) {
                Ok(page) => page,
                Err(source) => {
                    break TraversalEnd::Failed(TraversalFailed::Parse {
                        url: current.to_string(),
                        source,
                    })
                }
            };
            state = advance(state, TraversalState::Parsed);
            pages += 1;

            for node in &page.items {
                match self.extractor.extract(node, &category.name).await {
                    Extraction::Extracted(record) => records.push(record),
                    Extraction::Skipped(reason) => {
                        skipped += 1;
                        tracing::debug!("[{}] skipped item on {}: {}", category.name, current, reason);
                    }
                }
            }

            let next = match page.next_url() {
                Ok(Some(next)) => next,
                Ok(None) => break TraversalEnd::Exhausted,
                Err(e) => {
                    break TraversalEnd::Failed(TraversalFailed::Parse {
                        url: current.to_string(),
                        source: ParseError::Link(e),
                    })
                }
            };

            if visited.contains(&next) {
                break TraversalEnd::Failed(TraversalFailed::Cycle {
                    url: next.to_string(),
                });
            }

            state = advance(state, TraversalState::HasNext);
            state = advance(state, TraversalState::Fetching);
            current = next;
        };

        advance(state, end.state());

        TraversalOutcome {
            records,
            pages,
            skipped,
            end,
        }
    }
}

fn advance(from: TraversalState, to: TraversalState) -> TraversalState {
    debug_assert!(
        from.can_transition_to(to),
        "invalid traversal transition {} -> {}",
        from,
        to
    );
    tracing::trace!("traversal {} -> {}", from, to);
    to
}
