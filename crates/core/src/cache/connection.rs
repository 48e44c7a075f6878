//! Cache database connection management.

use crate::Error;
use crate::db::{self, Migration, Schema};
use std::path::Path;
use tokio_rusqlite::Connection;

static CACHE_SCHEMA: Schema = Schema {
    name: "cache",
    migrations: &[Migration { version: 1, sql: include_str!("../../migrations/001_cache_entries.sql") }],
};

/// Cache database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Clones share the same connection.
#[derive(Clone, Debug)]
pub struct CacheDb {
    pub(crate) conn: Connection,
}

impl CacheDb {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = db::open(path, &CACHE_SCHEMA).await?;
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = db::open_in_memory(&CACHE_SCHEMA).await?;
        Ok(Self { conn })
    }

    /// Release the connection. Other clones fail with a closed-connection
    /// error afterwards.
    pub async fn close(self) -> Result<(), Error> {
        db::close(self.conn).await
    }
}
