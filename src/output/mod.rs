//! Output module for turning crawl records into datasets and reports
//!
//! This module handles:
//! - Cleaning raw records before they are loaded
//! - Tabular (CSV) export and re-import
//! - Dataset statistics and markdown summaries
//! - The filtered dataset view used by `--dashboard`

pub mod clean;
pub mod csv_export;
pub mod dashboard;
mod markdown;
pub mod stats;

pub use clean::clean_records;
pub use csv_export::{read_csv, write_csv};
pub use dashboard::{load_dataset, DashboardMetrics, DatasetFilter, DatasetSource};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, DatasetStatistics, GenreStats};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type ExportResult<T> = Result<T, ExportError>;
