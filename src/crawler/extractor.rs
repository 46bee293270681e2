//! Per-item extraction
//!
//! Combines one listing-page item node with one detail-page fetch to build a
//! [`BookRecord`]. Any failure along the way skips only that item.

use crate::catalog::BookRecord;
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::parser::{
    parse_item_detail, parse_item_summary, CatalogSelectors, ItemNode, ParseError,
};
use crate::crawler::throttle::Throttle;
use thiserror::Error;
use url::Url;

/// Why an item was left out of the result
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("unreadable listing entry: {0}")]
    Summary(#[source] ParseError),

    #[error("detail page fetch failed: {0}")]
    DetailFetch(#[source] FetchError),

    #[error("unreadable detail page {url}: {source}")]
    Detail {
        url: String,
        #[source]
        source: ParseError,
    },
}

/// Outcome of extracting one item
#[derive(Debug)]
pub enum Extraction {
    Extracted(BookRecord),
    Skipped(SkipReason),
}

/// Builds one record per listing-page item node
pub struct ItemExtractor<'a> {
    fetcher: &'a Fetcher,
    selectors: &'a CatalogSelectors,
    catalogue: &'a Url,
    throttle: &'a Throttle,
}

impl<'a> ItemExtractor<'a> {
    pub fn new(
        fetcher: &'a Fetcher,
        selectors: &'a CatalogSelectors,
        catalogue: &'a Url,
        throttle: &'a Throttle,
    ) -> Self {
        Self {
            fetcher,
            selectors,
            catalogue,
            throttle,
        }
    }

    /// Extracts one record, with `genre` forced to the owning category's name
    ///
    /// # Steps
    ///
    /// 1. Parse title, price and detail URL from the item node
    /// 2. Fetch the detail page
    /// 3. Parse description and ISBN from it
    /// 4. Pace before returning, so consecutive detail fetches stay spaced out
    ///
    /// A failure at any step yields [`Extraction::Skipped`]; nothing propagates.
    pub async fn extract(&self, node: &ItemNode, genre: &str) -> Extraction {
        let summary = match parse_item_summary(node, self.catalogue, self.selectors) {
            Ok(summary) => summary,
            Err(e) => return Extraction::Skipped(SkipReason::Summary(e)),
        };

        let body = match self.fetcher.fetch(&summary.detail_url).await {
            Ok(body) => body,
            Err(e) => return Extraction::Skipped(SkipReason::DetailFetch(e)),
        };

        let detail = match parse_item_detail(&body, self.selectors) {
            Ok(detail) => detail,
            Err(source) => {
                return Extraction::Skipped(SkipReason::Detail {
                    url: summary.detail_url.to_string(),
                    source,
                })
            }
        };

        self.throttle.pace().await;

        Extraction::Extracted(BookRecord {
            title: summary.title,
            price: summary.price,
            genre: genre.to_string(),
            isbn: detail.isbn,
            description: detail.description,
        })
    }
}
