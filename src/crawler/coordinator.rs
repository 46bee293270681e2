//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns everything one crawl needs (fetcher, compiled
//! selectors, resolved URLs, throttle) and applies the containment policy:
//! - root page failure aborts the whole crawl ([`CrawlFatal`])
//! - a failed category keeps its partial records and the crawl moves on
//! - skipped items are absorbed by the extractor

use crate::catalog::{Category, CrawlResult};
use crate::config::Config;
use crate::crawler::extractor::ItemExtractor;
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::parser::{parse_categories, CatalogSelectors, ParseError};
use crate::crawler::throttle::Throttle;
use crate::crawler::traversal::{PageTraversal, TraversalEnd};
use crate::state::TraversalState;
use crate::url::{catalogue_base, parse_root_url};
use crate::ShelfError;
use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

/// Root-level failure: the crawl produced nothing
#[derive(Debug, Error)]
pub enum CrawlFatal {
    #[error("root page unreachable: {0}")]
    RootUnreachable(#[source] FetchError),

    #[error("root page {url} unparsable: {source}")]
    RootUnparsable {
        url: String,
        #[source]
        source: ParseError,
    },
}

/// Outcome of one category, for logging and reporting
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub name: String,
    pub url: String,
    pub pages: usize,
    pub extracted: usize,
    pub skipped: usize,
    /// `Exhausted` or `Failed`
    pub end: TraversalState,
    pub failure: Option<String>,
}

/// Bookkeeping for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub root_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub categories: Vec<CategoryReport>,
}

impl CrawlReport {
    pub fn total_extracted(&self) -> usize {
        self.categories.iter().map(|c| c.extracted).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.categories.iter().map(|c| c.skipped).sum()
    }

    pub fn failed_categories(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.end == TraversalState::Failed)
            .count()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Fetcher,
    selectors: CatalogSelectors,
    throttle: Throttle,
    root: Url,
    catalogue: Url,
}

impl Coordinator {
    /// Creates a new coordinator from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(ShelfError)` - Bad root URL, selector, or HTTP client setup
    pub fn new(config: &Config) -> Result<Self, ShelfError> {
        let root = parse_root_url(&config.crawler.root_url)?;
        let catalogue = catalogue_base(&root, &config.crawler.detail_path_prefix)?;

        Ok(Self {
            fetcher: Fetcher::from_config(&config.crawler)?,
            selectors: CatalogSelectors::from_config(&config.selectors)?,
            throttle: Throttle::from_millis(config.crawler.detail_delay_ms),
            root,
            catalogue,
        })
    }

    pub fn root_url(&self) -> &Url {
        &self.root
    }

    /// Fetches the root page and reads the category list from it
    pub async fn categories(&self) -> Result<Vec<Category>, CrawlFatal> {
        let body = self
            .fetcher
            .fetch(&self.root)
            .await
            .map_err(CrawlFatal::RootUnreachable)?;

        parse_categories(&body, &self.root, &self.selectors).map_err(|source| {
            CrawlFatal::RootUnparsable {
                url: self.root.to_string(),
                source,
            }
        })
    }

    /// Runs a complete crawl and returns the records
    ///
    /// Callable repeatedly; each call starts from the root page.
    pub async fn crawl(&self) -> Result<CrawlResult, CrawlFatal> {
        self.crawl_with_report().await.map(|(result, _)| result)
    }

    /// Runs a complete crawl and also returns per-category bookkeeping
    pub async fn crawl_with_report(&self) -> Result<(CrawlResult, CrawlReport), CrawlFatal> {
        let started_at = Utc::now();
        tracing::info!("Connecting to catalog at {}", self.root);

        let categories = self.categories().await.map_err(|e| {
            tracing::error!("Crawl aborted: {}", e);
            e
        })?;
        tracing::info!("Found {} categories to crawl", categories.len());

        let extractor = ItemExtractor::new(&self.fetcher, &self.selectors, &self.catalogue, &self.throttle);
        let traversal = PageTraversal::new(&self.fetcher, &self.selectors, &extractor);

        let mut result = CrawlResult::new();
        let mut reports = Vec::with_capacity(categories.len());

        for (index, category) in categories.iter().enumerate() {
            tracing::info!(
                "[{}/{}] Crawling category '{}'",
                index + 1,
                categories.len(),
                category.name
            );

            let outcome = traversal.run(category).await;
            let failure = match &outcome.end {
                TraversalEnd::Exhausted => None,
                TraversalEnd::Failed(reason) => {
                    tracing::warn!(
                        "Category '{}' abandoned after {} page(s): {}",
                        category.name,
                        outcome.pages,
                        reason
                    );
                    Some(reason.to_string())
                }
            };

            tracing::info!(
                "Category '{}': {} extracted, {} skipped, {} page(s)",
                category.name,
                outcome.records.len(),
                outcome.skipped,
                outcome.pages
            );

            reports.push(CategoryReport {
                name: category.name.clone(),
                url: category.url.to_string(),
                pages: outcome.pages,
                extracted: outcome.records.len(),
                skipped: outcome.skipped,
                end: outcome.end.state(),
                failure,
            });
            result.extend(outcome.records);
        }

        let report = CrawlReport {
            root_url: self.root.to_string(),
            started_at,
            finished_at: Utc::now(),
            categories: reports,
        };

        tracing::info!(
            "Crawl completed: {} records from {} categories ({} abandoned) in {}s",
            result.len(),
            report.categories.len(),
            report.failed_categories(),
            report.duration_seconds()
        );

        Ok((result, report))
    }
}
