//! Catalog data model
//!
//! Categories are read once per crawl from the root page. Book records are
//! assembled by the item extractor and accumulated, in traversal order, into a
//! [`CrawlResult`].

use serde::{Deserialize, Serialize};
use url::Url;

/// A genre grouping under which the catalog organizes paginated listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Display name, used verbatim as the genre of every record found under it
    pub name: String,

    /// Absolute URL of the first listing page
    pub url: Url,
}

impl Category {
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

/// One extracted catalog item
///
/// Field order matches the tabular export columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub price: f64,
    pub genre: String,
    pub isbn: Option<String>,
    pub description: String,
}

/// Ordered records produced by one crawl
///
/// Insertion order is category order, then page order, then in-page order.
/// No uniqueness is enforced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlResult {
    records: Vec<BookRecord>,
}

impl CrawlResult {
    /// Creates an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every record of a finished category traversal
    pub(crate) fn extend(&mut self, records: Vec<BookRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<BookRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records extracted under a given genre, in order
    pub fn by_genre<'a>(&'a self, genre: &'a str) -> impl Iterator<Item = &'a BookRecord> + 'a {
        self.records.iter().filter(move |r| r.genre == genre)
    }
}

impl From<Vec<BookRecord>> for CrawlResult {
    fn from(records: Vec<BookRecord>) -> Self {
        Self { records }
    }
}

impl IntoIterator for CrawlResult {
    type Item = BookRecord;
    type IntoIter = std::vec::IntoIter<BookRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
