//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::catalog::BookRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::{LoadRecord, INSERT_BATCH_SIZE};
use chrono::Utc;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Opens an existing database read-only
    ///
    /// No schema is created and no PRAGMAs are written, so a store on a
    /// read-only filesystem can still be read. A missing file is an error.
    pub fn open_existing(path: &Path) -> StorageResult<Self> {
        if !path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("database not found: {}", path.display()),
            )
            .into());
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    fn replace_collection(
        &mut self,
        collection: &str,
        records: &[BookRecord],
        config_hash: &str,
    ) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;

        let removed = tx.execute(
            "DELETE FROM documents WHERE collection = ?1",
            params![collection],
        )?;
        tracing::debug!("Cleared {} documents from '{}'", removed, collection);

        {
            let mut stmt = tx.prepare(
                "INSERT INTO documents (collection, position, body) VALUES (?1, ?2, ?3)",
            )?;

            for (batch_index, batch) in records.chunks(INSERT_BATCH_SIZE).enumerate() {
                let offset = batch_index * INSERT_BATCH_SIZE;
                for (i, record) in batch.iter().enumerate() {
                    let body = serde_json::to_string(record)?;
                    stmt.execute(params![collection, (offset + i) as i64, body])?;
                }
                tracing::trace!(
                    "Inserted batch {} ({} documents) into '{}'",
                    batch_index + 1,
                    batch.len(),
                    collection
                );
            }
        }

        tx.execute(
            "INSERT INTO loads (collection, loaded_at, config_hash, document_count)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                collection,
                Utc::now().to_rfc3339(),
                config_hash,
                records.len() as i64
            ],
        )?;

        tx.commit()?;
        Ok(records.len())
    }

    fn load_collection(&self, collection: &str) -> StorageResult<Vec<BookRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT body FROM documents WHERE collection = ?1 ORDER BY position")?;

        let bodies = stmt
            .query_map(params![collection], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(bodies.len());
        for body in bodies {
            records.push(serde_json::from_str(&body)?);
        }
        Ok(records)
    }

    fn count_documents(&self, collection: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn latest_load(&self, collection: &str) -> StorageResult<Option<LoadRecord>> {
        let load = self
            .conn
            .query_row(
                "SELECT id, collection, loaded_at, config_hash, document_count
                 FROM loads WHERE collection = ?1 ORDER BY id DESC LIMIT 1",
                params![collection],
                |row| {
                    Ok(LoadRecord {
                        id: row.get(0)?,
                        collection: row.get(1)?,
                        loaded_at: row.get(2)?,
                        config_hash: row.get(3)?,
                        document_count: row.get::<_, i64>(4)? as u64,
                    })
                },
            )
            .optional()?;

        Ok(load)
    }

    fn list_collections(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT collection FROM documents ORDER BY collection")?;

        let collections = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(collections)
    }
}
