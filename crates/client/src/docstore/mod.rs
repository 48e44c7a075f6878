//! SQLite-backed document collections.
//!
//! Documents are stored as JSON text, one row per document, grouped by
//! collection name. Filters are evaluated in Rust on the connection's
//! background thread, so only matching documents cross back to the caller.

use std::path::Path;

use async_trait::async_trait;
use readthru_core::db::{self, Migration, Schema};
use readthru_core::{Document, DocumentStore, Error, Filter};
use serde_json::Value;
use tokio_rusqlite::{Connection, params};

/// Field carrying the row id on returned documents.
pub const ID_FIELD: &str = "_id";

static DOCUMENT_SCHEMA: Schema = Schema {
    name: "documents",
    migrations: &[Migration { version: 1, sql: include_str!("../../migrations/001_documents.sql") }],
};

/// Document store handle.
///
/// Wraps a tokio-rusqlite Connection; clones share the same connection.
#[derive(Clone, Debug)]
pub struct DocumentDb {
    conn: Connection,
}

impl DocumentDb {
    /// Open a document database at the specified path, creating it if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = db::open(path, &DOCUMENT_SCHEMA).await?;
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = db::open_in_memory(&DOCUMENT_SCHEMA).await?;
        Ok(Self { conn })
    }

    /// Release the connection.
    pub async fn close(self) -> Result<(), Error> {
        db::close(self.conn).await
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: &str) -> Result<u64, Error> {
        let collection = collection.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                    params![collection],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

fn decode_body(id: i64, body: &str) -> Result<Document, Error> {
    let mut document: Document =
        serde_json::from_str(body).map_err(|e| Error::Decode(format!("document {id}: {e}")))?;
    document.insert(ID_FIELD.into(), Value::from(id));
    Ok(document)
}

#[async_trait]
impl DocumentStore for DocumentDb {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, Error> {
        let collection = collection.to_string();
        let filter = filter.clone();
        self.conn
            .call(move |conn| -> Result<Vec<Document>, Error> {
                let mut stmt = conn.prepare("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY id")?;
                let rows = stmt.query_map(params![collection], |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
                })?;

                let mut matched = Vec::new();
                for row in rows {
                    let (id, body) = row?;
                    let document = decode_body(id, &body)?;
                    if filter.matches(&document) {
                        matched.push(document);
                    }
                }
                Ok(matched)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_all(&self, collection: &str) -> Result<u64, Error> {
        let collection = collection.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM documents WHERE collection = ?1", params![collection])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<i64, Error> {
        document.remove(ID_FIELD);
        let body = serde_json::to_string(&document).map_err(|e| Error::Encode(e.to_string()))?;
        let collection = collection.to_string();
        let inserted_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<i64, Error> {
                conn.execute(
                    "INSERT INTO documents (collection, body, inserted_at) VALUES (?1, ?2, ?3)",
                    params![collection, body, inserted_at],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(Error::from)
    }
}
