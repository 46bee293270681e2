//! Crawler module for catalog traversal and extraction
//!
//! This module contains the core crawling logic, including:
//! - Single-attempt HTTP fetching with a fixed timeout
//! - HTML parsing of root, listing and detail pages
//! - Per-item extraction with failure isolation
//! - Per-category pagination traversal
//! - Overall crawl coordination and pacing

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod throttle;
mod traversal;

pub use coordinator::{CategoryReport, Coordinator, CrawlFatal, CrawlReport};
pub use extractor::{Extraction, ItemExtractor, SkipReason};
pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use parser::{
    extract_isbn, parse_categories, parse_item_detail, parse_item_summary, parse_listing_page,
    parse_price, CatalogSelectors, ItemDetail, ItemNode, ItemSummary, ListingPage, ParseError,
};
pub use throttle::Throttle;
pub use traversal::{PageTraversal, TraversalEnd, TraversalFailed, TraversalOutcome};

use crate::catalog::CrawlResult;
use crate::config::Config;
use crate::ShelfError;

/// Runs a complete crawl
///
/// This is the main entry point. It will:
/// 1. Fetch the root page and read the categories (failure here is fatal)
/// 2. Walk every category's listing pages in order
/// 3. Extract one record per item, fetching its detail page
/// 4. Return all records in traversal order
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Crawl completed (possibly with abandoned categories)
/// * `Err(ShelfError)` - Setup failed or the root page could not be used
///
/// # Example
///
/// ```no_run
/// use sumi_shelf::config::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let result = sumi_shelf::crawl(&config).await?;
/// println!("{} records", result.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config) -> Result<CrawlResult, ShelfError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.crawl().await?)
}
