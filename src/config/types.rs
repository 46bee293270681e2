use serde::Deserialize;

/// Main configuration structure for Sumi-Shelf
///
/// Every section is optional; missing keys fall back to the catalog defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Catalog root page; categories are read from here
    pub root_url: String,

    /// Fixed timeout applied to every request (seconds)
    pub request_timeout_secs: u64,

    /// Pause after each detail-page fetch (milliseconds)
    pub detail_delay_ms: u64,

    /// Path joined onto the root URL to form the base of detail-page URLs
    pub detail_path_prefix: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_url: "http://books.toscrape.com/".to_string(),
            request_timeout_secs: 10,
            detail_delay_ms: 500,
            detail_path_prefix: "catalogue/".to_string(),
        }
    }
}

/// CSS selectors describing the catalog markup
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SelectorConfig {
    /// Navigation entries on the root page (the first one is the catch-all)
    pub categories: String,

    /// Item container nodes on a listing page
    pub item: String,

    /// Title link inside an item node
    pub item_title: String,

    /// Price text inside an item node
    pub item_price: String,

    /// "Next page" link on a listing page
    pub next_page: String,

    /// Description node on a detail page
    pub detail_description: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            categories: ".nav-list a".to_string(),
            item: "article.product_pod".to_string(),
            item_title: "h3 a".to_string(),
            item_price: "p.price_color".to_string(),
            next_page: "li.next a".to_string(),
            detail_description: r#"meta[name="description"]"#.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Tabular export of the records as crawled
    pub raw_csv_path: String,

    /// Tabular export after cleaning; also the dashboard fallback
    pub cleaned_csv_path: String,

    /// Path to the SQLite document store
    pub database_path: String,

    /// Collection replaced on every load
    pub collection: String,

    /// Path to the markdown summary file
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            raw_csv_path: "raw_books.csv".to_string(),
            cleaned_csv_path: "cleaned_books.csv".to_string(),
            database_path: "books.db".to_string(),
            collection: "books".to_string(),
            summary_path: "book_summary.md".to_string(),
        }
    }
}
