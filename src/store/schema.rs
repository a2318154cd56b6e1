// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Table layout for collections and their embeddings.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

pub const COLLECTIONS_TABLE: &str = "collections";
pub const EMBEDDINGS_TABLE: &str = "embeddings";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS collections (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE,
    model TEXT
);
CREATE TABLE IF NOT EXISTS embeddings (
    collection_id INTEGER REFERENCES collections(id),
    id TEXT,
    embedding BLOB,
    content TEXT,
    metadata TEXT,
    PRIMARY KEY (collection_id, id)
);
";

pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![table],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

/// Creates both tables unless the `collections` table is already present.
///
/// Returns `true` when this call created the schema.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<bool> {
    if table_exists(conn, COLLECTIONS_TABLE)? {
        return Ok(false);
    }
    conn.execute_batch(SCHEMA)?;
    debug!("Created {} and {} tables", COLLECTIONS_TABLE, EMBEDDINGS_TABLE);
    Ok(true)
}
