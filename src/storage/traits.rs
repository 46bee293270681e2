//! Storage traits and error types
//!
//! This module defines the trait interface for document-store backends and
//! associated error types.

use crate::catalog::BookRecord;
use crate::storage::LoadRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document-store backends
pub trait Storage {
    /// Replaces every document of a collection with `records`
    ///
    /// Old contents are deleted and the new documents inserted in order, as one
    /// atomic unit. A load entry is recorded alongside.
    ///
    /// # Returns
    ///
    /// The number of documents inserted
    fn replace_collection(
        &mut self,
        collection: &str,
        records: &[BookRecord],
        config_hash: &str,
    ) -> StorageResult<usize>;

    /// Reads every document of a collection in insertion order
    fn load_collection(&self, collection: &str) -> StorageResult<Vec<BookRecord>>;

    /// Counts the documents of a collection
    fn count_documents(&self, collection: &str) -> StorageResult<u64>;

    /// Gets the most recent load of a collection
    fn latest_load(&self, collection: &str) -> StorageResult<Option<LoadRecord>>;

    /// Lists collections that currently hold documents
    fn list_collections(&self) -> StorageResult<Vec<String>>;
}
