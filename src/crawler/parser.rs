//! HTML parser for catalog pages
//!
//! This module turns raw HTML into catalog data:
//! - Category links from the root page navigation
//! - Item nodes and the "next page" link from a listing page
//! - Title, price and detail link from one item node
//! - Description and ISBN from a detail page
//!
//! Everything here is pure: no I/O, no logging. Failures are [`ParseError`],
//! kept distinct from fetch failures so callers can contain them differently.

use crate::catalog::Category;
use crate::config::SelectorConfig;
use crate::url::{resolve_detail_url, resolve_link};
use crate::{ConfigError, UrlError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

/// Failure to find or interpret an expected part of a page
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Missing {what} (selector '{selector}')")]
    MissingNode {
        what: &'static str,
        selector: String,
    },

    #[error("Missing '{attr}' attribute on {what}")]
    MissingAttribute {
        what: &'static str,
        attr: &'static str,
    },

    #[error("Empty item title")]
    EmptyTitle,

    #[error("Invalid price '{0}'")]
    PriceFormat(String),

    #[error("Unresolvable link: {0}")]
    Link(#[from] UrlError),
}

/// Compiled selector contract for one catalog site
#[derive(Debug, Clone)]
pub struct CatalogSelectors {
    categories: Selector,
    item: Selector,
    item_title: Selector,
    item_price: Selector,
    next_page: Selector,
    detail_description: Selector,
    sources: SelectorConfig,
}

impl CatalogSelectors {
    /// Compiles every selector of the configuration
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        use crate::config::validate_selector;

        Ok(Self {
            categories: validate_selector(&config.categories)?,
            item: validate_selector(&config.item)?,
            item_title: validate_selector(&config.item_title)?,
            item_price: validate_selector(&config.item_price)?,
            next_page: validate_selector(&config.next_page)?,
            detail_description: validate_selector(&config.detail_description)?,
            sources: config.clone(),
        })
    }
}

/// One item container from a listing page
///
/// Opaque to callers: it holds the node's outer HTML so it can outlive the
/// document it was cut from and be handed to the extractor on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemNode {
    html: String,
}

/// One parsed listing page
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// The page these items were read from
    pub url: Url,

    /// Item nodes in document order
    pub items: Vec<ItemNode>,

    /// Raw href of the "next" control, if the page has one
    pub next_href: Option<String>,
}

impl ListingPage {
    /// Resolves the next-page href against this page's own URL
    ///
    /// Returns `Ok(None)` on the last page of a category.
    pub fn next_url(&self) -> Result<Option<Url>, UrlError> {
        self.next_href
            .as_deref()
            .map(|href| resolve_link(&self.url, href))
            .transpose()
    }
}

/// Summary fields available on the listing page
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSummary {
    pub title: String,
    pub price: f64,
    pub detail_url: Url,
}

/// Extended fields available only on the detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetail {
    pub description: String,
    pub isbn: Option<String>,
}

/// Extracts categories from the root page
///
/// The first navigation entry is the catch-all "all books" pseudo-category and is
/// skipped. Remaining entries keep document order; entries with an empty name or
/// no usable href are dropped.
///
/// # Errors
///
/// `ParseError::MissingNode` when the navigation selector matches nothing at all.
///
/// # Example
///
/// ```
/// use sumi_shelf::config::SelectorConfig;
/// use sumi_shelf::crawler::{parse_categories, CatalogSelectors};
/// use url::Url;
///
/// let html = r#"<ul class="nav-list"><li><a href="all.html">Books</a>
///     <ul><li><a href="poetry/index.html"> Poetry </a></li></ul></li></ul>"#;
/// let selectors = CatalogSelectors::from_config(&SelectorConfig::default()).unwrap();
/// let root = Url::parse("http://books.example.com/").unwrap();
/// let categories = parse_categories(html, &root, &selectors).unwrap();
/// assert_eq!(categories[0].name, "Poetry");
/// ```
pub fn parse_categories(
    html: &str,
    root: &Url,
    selectors: &CatalogSelectors,
) -> Result<Vec<Category>, ParseError> {
    let document = Html::parse_document(html);
    let entries: Vec<ElementRef> = document.select(&selectors.categories).collect();

    if entries.is_empty() {
        return Err(ParseError::MissingNode {
            what: "category navigation",
            selector: selectors.sources.categories.clone(),
        });
    }

    let categories = entries
        .into_iter()
        .skip(1)
        .filter_map(|entry| {
            let name = entry.text().collect::<String>().trim().to_string();
            if name.is_empty() {
                tracing::warn!("Dropping unnamed category entry");
                return None;
            }
            let href = entry.value().attr("href")?;
            match resolve_link(root, href) {
                Ok(url) => Some(Category::new(name, url)),
                Err(e) => {
                    tracing::warn!("Dropping category '{}': {}", name, e);
                    None
                }
            }
        })
        .collect();

    Ok(categories)
}

/// Extracts item nodes and the optional next-page href from a listing page
///
/// A page with no items is valid. A "next" control without an href is an error,
/// since the page claims to continue but does not say where.
pub fn parse_listing_page(
    url: &Url,
    html: &str,
    selectors: &CatalogSelectors,
) -> Result<ListingPage, ParseError> {
    let document = Html::parse_document(html);

    let items = document
        .select(&selectors.item)
        .map(|element| ItemNode {
            html: element.html(),
        })
        .collect();

    let next_href = match document.select(&selectors.next_page).next() {
        Some(control) => {
            let href = control
                .value()
                .attr("href")
                .map(str::trim)
                .filter(|href| !href.is_empty())
                .ok_or(ParseError::MissingAttribute {
                    what: "next-page control",
                    attr: "href",
                })?;
            Some(href.to_string())
        }
        None => None,
    };

    Ok(ListingPage {
        url: url.clone(),
        items,
        next_href,
    })
}

/// Extracts title, price and detail URL from one item node
///
/// The title comes from the link's `title` attribute, falling back to its text.
/// The detail href is resolved against `catalogue` (see
/// [`resolve_detail_url`](crate::url::resolve_detail_url)).
pub fn parse_item_summary(
    node: &ItemNode,
    catalogue: &Url,
    selectors: &CatalogSelectors,
) -> Result<ItemSummary, ParseError> {
    let fragment = Html::parse_fragment(&node.html);

    let link = fragment
        .select(&selectors.item_title)
        .next()
        .ok_or_else(|| ParseError::MissingNode {
            what: "item title",
            selector: selectors.sources.item_title.clone(),
        })?;

    let title = link
        .value()
        .attr("title")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| collapse_whitespace(&link.text().collect::<String>()));
    if title.is_empty() {
        return Err(ParseError::EmptyTitle);
    }

    let href = link.value().attr("href").ok_or(ParseError::MissingAttribute {
        what: "item title link",
        attr: "href",
    })?;
    let detail_url = resolve_detail_url(catalogue, href)?;

    let price_text = fragment
        .select(&selectors.item_price)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or_else(|| ParseError::MissingNode {
            what: "item price",
            selector: selectors.sources.item_price.clone(),
        })?;
    let price = parse_price(&price_text)?;

    Ok(ItemSummary {
        title,
        price,
        detail_url,
    })
}

/// Extracts the description and optional ISBN from a detail page
///
/// The description is the `content` attribute of the matched node. A `<meta>`
/// without `content` is an error; other elements fall back to their text. A
/// missing ISBN is not an error.
pub fn parse_item_detail(html: &str, selectors: &CatalogSelectors) -> Result<ItemDetail, ParseError> {
    let document = Html::parse_document(html);

    let node = document
        .select(&selectors.detail_description)
        .next()
        .ok_or_else(|| ParseError::MissingNode {
            what: "detail description",
            selector: selectors.sources.detail_description.clone(),
        })?;

    let description = match node.value().attr("content") {
        Some(content) => content.trim().to_string(),
        None if node.value().name() == "meta" => {
            return Err(ParseError::MissingAttribute {
                what: "detail description",
                attr: "content",
            })
        }
        None => node.text().collect::<String>().trim().to_string(),
    };
    let isbn = extract_isbn(&description);

    Ok(ItemDetail { description, isbn })
}

/// Parses a displayed price such as `£51.77`
///
/// Leading currency symbols (and any mis-decoded bytes before them) are stripped
/// along with thousands separators. Negative or non-finite values are rejected.
pub fn parse_price(text: &str) -> Result<f64, ParseError> {
    let trimmed = text.trim();
    let numeric: String = trimmed
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '.' && c != '-')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    match numeric.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ParseError::PriceFormat(trimmed.to_string())),
    }
}

/// Finds the first ISBN-labelled token in free text
///
/// The label is case-insensitive and may be followed by hyphens, colons or
/// whitespace; the token is a run of digits, `X` and hyphens.
///
/// ```
/// use sumi_shelf::crawler::extract_isbn;
///
/// assert_eq!(extract_isbn("isbn: 978-0-06-231500-7."), Some("978-0-06-231500-7".to_string()));
/// assert_eq!(extract_isbn("No identifier here"), None);
/// ```
pub fn extract_isbn(text: &str) -> Option<String> {
    static ISBN_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = ISBN_PATTERN
        .get_or_init(|| Regex::new(r"(?i)ISBN[-\s:]*([0-9X-]+)").ok())
        .as_ref()?;

    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Collapses runs of whitespace into single spaces and trims the ends
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
