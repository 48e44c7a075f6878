//! SQLite connection management shared by the cache and the document store.
//!
//! Opens a database, applies the pragmas both stores rely on (WAL mode for
//! concurrent readers), and runs the schema's pending migrations.

pub mod migrations;

pub use migrations::{Migration, Schema};

use crate::Error;
use std::path::Path;
use tokio_rusqlite::Connection;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Open a database at the specified path and bring `schema` up to date.
///
/// Creates the file if it doesn't exist.
pub async fn open(path: impl AsRef<Path>, schema: &'static Schema) -> Result<Connection, Error> {
    let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
    prepare(&conn, schema).await?;
    Ok(conn)
}

/// Open an in-memory database with the same configuration as file-based ones.
pub async fn open_in_memory(schema: &'static Schema) -> Result<Connection, Error> {
    let conn = Connection::open_in_memory()
        .await
        .map_err(|e| Error::Database(e.into()))?;
    prepare(&conn, schema).await?;
    Ok(conn)
}

/// Close the connection, waiting for the background thread to release it.
pub async fn close(conn: Connection) -> Result<(), Error> {
    conn.close().await.map_err(Error::from)
}

async fn prepare(conn: &Connection, schema: &'static Schema) -> Result<(), Error> {
    conn.call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        Ok(())
    })
    .await
    .map_err(Error::Database)?;

    migrations::run(conn, schema).await
}

#[cfg(test)]
mod tests {
    use super::*;

    static EMPTY: Schema = Schema { name: "empty", migrations: &[] };

    #[tokio::test]
    async fn test_open_in_memory() {
        let conn = open_in_memory(&EMPTY).await.unwrap();
        let version = conn
            .call(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert!(!version.is_empty());
        close(conn).await.unwrap();
    }
}
