//! Dataset access for the `--dashboard` view
//!
//! The store is the primary source. When it cannot be read, or the collection
//! is empty, the cleaned CSV export is used instead.

use crate::catalog::BookRecord;
use crate::output::csv_export::read_csv;
use crate::output::stats::DatasetStatistics;
use crate::storage::{SqliteStorage, Storage};
use std::collections::HashSet;
use std::path::Path;

/// Where a loaded dataset came from
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    Store(Vec<BookRecord>),
    CsvFallback(Vec<BookRecord>),
    Empty,
}

impl DatasetSource {
    pub fn records(&self) -> &[BookRecord] {
        match self {
            Self::Store(records) | Self::CsvFallback(records) => records.as_slice(),
            Self::Empty => &[],
        }
    }

    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Store(_) => "document store",
            Self::CsvFallback(_) => "CSV fallback",
            Self::Empty => "empty",
        }
    }
}

/// Loads the dataset, falling back from the store to the CSV file
///
/// # Arguments
///
/// * `storage_path` - SQLite document store
/// * `collection` - Collection to read
/// * `csv_fallback` - Cleaned CSV export used when the store has nothing
pub fn load_dataset(storage_path: &Path, collection: &str, csv_fallback: &Path) -> DatasetSource {
    match load_from_store(storage_path, collection) {
        Ok(records) if !records.is_empty() => return DatasetSource::Store(records),
        Ok(_) => tracing::info!("Collection '{}' is empty, trying CSV fallback", collection),
        Err(e) => tracing::warn!("Could not read document store: {}", e),
    }

    match read_csv(csv_fallback) {
        Ok(records) if !records.is_empty() => DatasetSource::CsvFallback(records),
        Ok(_) => DatasetSource::Empty,
        Err(e) => {
            tracing::warn!("Could not read {}: {}", csv_fallback.display(), e);
            DatasetSource::Empty
        }
    }
}

fn load_from_store(
    storage_path: &Path,
    collection: &str,
) -> crate::storage::StorageResult<Vec<BookRecord>> {
    let storage = SqliteStorage::open_existing(storage_path)?;
    storage.load_collection(collection)
}

/// Genre and price filter applied to the dataset
#[derive(Debug, Clone, Default)]
pub struct DatasetFilter {
    /// Empty means every genre
    pub genres: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl DatasetFilter {
    /// Returns the records matching the filter; bounds are inclusive
    pub fn apply(&self, records: &[BookRecord]) -> Vec<BookRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    fn matches(&self, record: &BookRecord) -> bool {
        if !self.genres.is_empty() && !self.genres.iter().any(|g| *g == record.genre) {
            return false;
        }
        let above_min = self.min_price.map_or(true, |min| record.price >= min);
        let below_max = self.max_price.map_or(true, |max| record.price <= max);
        above_min && below_max
    }
}

/// Headline numbers for a filtered view
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub total_books: usize,
    pub average_price: f64,
    pub unique_genres: usize,
}

impl DashboardMetrics {
    pub fn from_records(records: &[BookRecord]) -> Self {
        let genres: HashSet<&str> = records.iter().map(|r| r.genre.as_str()).collect();
        let stats = DatasetStatistics::from_records(records);

        Self {
            total_books: records.len(),
            average_price: stats.average_price,
            unique_genres: genres.len(),
        }
    }
}
