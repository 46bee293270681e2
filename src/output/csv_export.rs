//! CSV export of book records
//!
//! Columns are `title, price, genre, isbn, description`; an absent ISBN is an
//! empty cell.

use crate::catalog::BookRecord;
use crate::output::ExportResult;
use std::path::Path;

/// Writes records to a CSV file, replacing any existing file
///
/// # Arguments
///
/// * `path` - Destination file
/// * `records` - Records to write, in order
///
/// # Returns
///
/// The number of rows written
pub fn write_csv(path: &Path, records: &[BookRecord]) -> ExportResult<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(records.len())
}

/// Reads records back from a CSV file written by [`write_csv`]
pub fn read_csv(path: &Path) -> ExportResult<Vec<BookRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
