// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Persistent identity and rows for collections and embeddings.
//!
//! Backed by a single SQLite connection. Nothing here coordinates concurrent
//! writers; a busy timeout lets SQLite's own locking serialize other processes.

pub mod schema;

use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::core::types::{CollectionInfo, EmbeddingRecord, Metadata};
use crate::error::{CollectionError, Result};

pub struct EmbeddingStore {
    conn: Connection,
}

impl EmbeddingStore {
    pub fn open(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let conn = match &config.path {
            Some(path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        conn.busy_timeout(config.busy_timeout)?;
        debug!(
            "Opened embedding store at {}",
            config
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| crate::config::IN_MEMORY_PATH.to_string())
        );
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(&StoreConfig::in_memory())
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create the tables if they are missing. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> Result<bool> {
        Ok(schema::ensure_schema(&self.conn)?)
    }

    /// Read-only lookup; a database without the schema has no collections.
    pub fn find_collection(&self, name: &str) -> Result<Option<CollectionInfo>> {
        if !self.has_table(schema::COLLECTIONS_TABLE)? {
            return Ok(None);
        }
        let row = self
            .conn
            .query_row(
                "SELECT id, name, model FROM collections WHERE name = ?1",
                params![name],
                |row| {
                    Ok(CollectionInfo {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        model_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Look up `name`, inserting a new row when it is absent.
    ///
    /// `model_id` is only invoked on the creation path. A stored model id always wins
    /// over whatever the caller would have supplied. Concurrent first use of the same
    /// name is not guarded against.
    pub fn resolve_or_create<F>(&self, name: &str, model_id: F) -> Result<CollectionInfo>
    where
        F: FnOnce() -> Result<String>,
    {
        self.ensure_schema()?;
        if let Some(existing) = self.find_collection(name)? {
            debug!("Resolved collection {} to id {}", name, existing.id);
            return Ok(existing);
        }

        let model_id = model_id()?;
        self.conn.execute(
            "INSERT INTO collections (name, model) VALUES (?1, ?2)",
            params![name, model_id],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("Created collection {} (id {}, model {})", name, id, model_id);

        Ok(CollectionInfo {
            id,
            name: name.to_string(),
            model_id,
        })
    }

    fn has_table(&self, table: &str) -> Result<bool> {
        Ok(schema::table_exists(&self.conn, table)?)
    }

    /// Existence check that never creates tables or rows.
    pub fn exists(&self, name: &str) -> Result<bool> {
        if !self.has_table(schema::COLLECTIONS_TABLE)? {
            return Ok(false);
        }
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM collections WHERE name = ?1",
                params![name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Number of embeddings stored under `name`.
    ///
    /// The lookup joins through the collection name, so an unknown name counts as an
    /// empty collection and yields 0 instead of an error.
    pub fn count(&self, name: &str) -> Result<usize> {
        self.ensure_schema()?;
        let count: i64 = self.conn.query_row(
            "SELECT count(*) FROM embeddings WHERE collection_id = (
                SELECT id FROM collections WHERE name = ?1
            )",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Every collection with its embedding count, ordered by name.
    pub fn list_collections(&self) -> Result<Vec<(CollectionInfo, usize)>> {
        if !self.has_table(schema::COLLECTIONS_TABLE)? {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.name, c.model, count(e.id)
             FROM collections c LEFT JOIN embeddings e ON e.collection_id = c.id
             GROUP BY c.id ORDER BY c.name",
        )?;
        let rows = stmt.query_map([], |row| {
            let count: i64 = row.get(3)?;
            Ok((
                CollectionInfo {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    model_id: row.get(2)?,
                },
                count as usize,
            ))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Append one embedding row. A repeated `(collection_id, id)` is rejected.
    pub fn insert_embedding(
        &self,
        collection_id: i64,
        id: &str,
        embedding: &[u8],
        content: Option<&str>,
        metadata: Option<&Metadata>,
    ) -> Result<()> {
        let metadata = match metadata {
            Some(m) if !m.is_empty() => Some(serde_json::to_string(m)?),
            _ => None,
        };

        self.conn
            .execute(
                "INSERT INTO embeddings (collection_id, id, embedding, content, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![collection_id, id, embedding, content, metadata],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(ref err, _)
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    CollectionError::Duplicate {
                        collection_id,
                        id: id.to_string(),
                    }
                }
                other => CollectionError::Storage(other),
            })?;

        debug!(
            "Stored embedding {} in collection {} ({} bytes)",
            id,
            collection_id,
            embedding.len()
        );
        Ok(())
    }

    pub fn fetch_embedding(&self, collection_id: i64, id: &str) -> Result<Vec<u8>> {
        if !self.has_table(schema::EMBEDDINGS_TABLE)? {
            return Err(CollectionError::NotFound {
                collection: collection_id,
                id: id.to_string(),
            });
        }
        self.conn
            .query_row(
                "SELECT embedding FROM embeddings WHERE collection_id = ?1 AND id = ?2",
                params![collection_id, id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| CollectionError::NotFound {
                collection: collection_id,
                id: id.to_string(),
            })
    }

    pub fn fetch_record(&self, collection_id: i64, id: &str) -> Result<EmbeddingRecord> {
        if !self.has_table(schema::EMBEDDINGS_TABLE)? {
            return Err(CollectionError::NotFound {
                collection: collection_id,
                id: id.to_string(),
            });
        }
        let row = self
            .conn
            .query_row(
                "SELECT embedding, content, metadata FROM embeddings
                 WHERE collection_id = ?1 AND id = ?2",
                params![collection_id, id],
                |row| {
                    Ok((
                        row.get::<_, Vec<u8>>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        let (embedding, content, metadata) = row.ok_or_else(|| CollectionError::NotFound {
            collection: collection_id,
            id: id.to_string(),
        })?;

        let metadata = match metadata {
            Some(raw) => Some(serde_json::from_str::<Metadata>(&raw)?),
            None => None,
        };

        Ok(EmbeddingRecord {
            collection_id,
            id: id.to_string(),
            embedding,
            content,
            metadata,
        })
    }

    /// Visit every stored vector in a collection in storage order.
    ///
    /// Returns the number of rows visited; a database without the schema has none.
    pub fn for_each_embedding<F>(
        &self,
        collection_id: i64,
        exclude_id: Option<&str>,
        mut visit: F,
    ) -> Result<usize>
    where
        F: FnMut(String, &[u8]) -> Result<()>,
    {
        if !self.has_table(schema::EMBEDDINGS_TABLE)? {
            return Ok(0);
        }
        let mut stmt = self.conn.prepare(
            "SELECT id, embedding FROM embeddings
             WHERE collection_id = ?1 AND (?2 IS NULL OR id != ?2)
             ORDER BY rowid",
        )?;
        let mut rows = stmt.query(params![collection_id, exclude_id])?;

        let mut visited = 0;
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let blob = row
                .get_ref(1)?
                .as_blob()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Blob, Box::new(e)))?;
            visit(id, blob)?;
            visited += 1;
        }
        Ok(visited)
    }
}
