//! Database schema migrations.
//!
//! Uses a version table keyed by schema name, so the cache and the document
//! store can share a file without their version numbers colliding. Each
//! migration is a SQL batch that transforms the schema.

use crate::Error;
use tokio_rusqlite::{Connection, params};

/// A single versioned SQL batch.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub sql: &'static str,
}

/// An ordered list of migrations belonging to one logical schema.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub migrations: &'static [Migration],
}

/// Run any pending migrations for `schema`.
///
/// This creates the _migrations table if it doesn't exist, checks the
/// current version of the schema, and applies any migrations that haven't
/// been run yet. Each migration and its version record commit together.
///
/// # Errors
///
/// Returns an error if the migration list is not strictly increasing (before
/// anything is applied) or a migration SQL fails to execute.
pub async fn run(conn: &Connection, schema: &'static Schema) -> Result<(), Error> {
    check_order(schema)?;

    conn.call(move |conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                schema TEXT NOT NULL,
                version INTEGER NOT NULL,
                applied_at TEXT NOT NULL,
                PRIMARY KEY (schema, version)
            )",
            [],
        )?;

        let current: i64 = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM _migrations WHERE schema = ?1",
            params![schema.name],
            |row| row.get(0),
        )?;

        for migration in schema.migrations.iter().filter(|m| m.version > current) {
            let tx = conn.transaction()?;
            tx.execute_batch(migration.sql)?;
            tx.execute(
                "INSERT INTO _migrations (schema, version, applied_at) VALUES (?1, ?2, ?3)",
                params![schema.name, migration.version, chrono::Utc::now().to_rfc3339()],
            )?;
            tx.commit()?;
            tracing::debug!(schema = schema.name, version = migration.version, "applied migration");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

fn check_order(schema: &Schema) -> Result<(), Error> {
    let mut previous = 0;
    for migration in schema.migrations {
        if migration.version <= previous {
            return Err(Error::MigrationFailed(format!(
                "{}: version {} is not greater than {}",
                schema.name, migration.version, previous
            )));
        }
        previous = migration.version;
    }
    Ok(())
}
