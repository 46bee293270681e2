//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Sumi-Shelf store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Documents grouped by collection; position keeps insertion order
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    position INTEGER NOT NULL,
    body TEXT NOT NULL,
    UNIQUE(collection, position)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);

-- One row per collection replacement
CREATE TABLE IF NOT EXISTS loads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    loaded_at TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    document_count INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_loads_collection ON loads(collection);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
