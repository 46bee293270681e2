//! Storage module for persisting crawled datasets
//!
//! The store keeps JSON documents grouped into named collections. Loading a
//! dataset replaces the whole collection; every load is stamped with a
//! timestamp, the config hash and the document count.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::ShelfError;
use std::path::Path;

/// Documents inserted per statement batch
pub const INSERT_BATCH_SIZE: usize = 100;

/// Initializes or opens a storage database
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(ShelfError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, ShelfError> {
    Ok(SqliteStorage::new(path)?)
}

/// Represents one load of a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRecord {
    pub id: i64,
    pub collection: String,
    pub loaded_at: String,
    pub config_hash: String,
    pub document_count: u64,
}
