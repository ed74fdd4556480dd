//! Database schema management.
//!
//! There is no incremental migration path. When the version recorded in `schema_version` differs
//! from `CURRENT_VERSION`, the `expenses` and `users` tables are dropped and recreated:
//! - `drop.sql` - Removes all tables and indexes of the schema
//! - `schema.sql` - Creates the schema at `CURRENT_VERSION`

use anyhow::Context;
use sqlx::{Connection, SqliteConnection};
use tracing::{debug, warn};

use crate::Result;

/// The schema version this build of the program reads and writes.
pub(crate) const CURRENT_VERSION: i32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");
const DROP_SQL: &str = include_str!("drop.sql");

/// Creates the `schema_version` table in an empty database and records version 0.
pub(crate) async fn bootstrap(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query("CREATE TABLE schema_version (version INTEGER NOT NULL)")
        .execute(&mut *conn)
        .await
        .context("Failed to create schema_version table")?;

    sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
        .execute(&mut *conn)
        .await
        .context("Failed to insert initial schema version")?;
    Ok(())
}

/// Reads the schema version recorded in the database.
pub(crate) async fn version(conn: &mut SqliteConnection) -> Result<i32> {
    let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
        .fetch_one(&mut *conn)
        .await
        .context("Failed to query schema version. Is this an expenses database?")?;
    Ok(row.0.unwrap_or_default())
}

/// Brings the database from `current_ver` to `target_ver`.
///
/// - If the versions are equal, nothing happens.
/// - Otherwise the schema is dropped and recreated. Any existing users and expenses are lost.
///
/// The drop, the create and the `schema_version` update run in one transaction.
pub(crate) async fn run(
    conn: &mut SqliteConnection,
    current_ver: i32,
    target_ver: i32,
) -> Result<()> {
    if current_ver == target_ver {
        debug!("Database already at target version {target_ver}, no migrations needed");
        return Ok(());
    }

    if current_ver != 0 {
        warn!(
            "Database schema version {current_ver} does not match version {target_ver}, \
            recreating all tables; existing data will be discarded"
        );
    }

    let mut tx = conn
        .begin()
        .await
        .context("Failed to begin migration transaction")?;

    sqlx::raw_sql(DROP_SQL)
        .execute(&mut *tx)
        .await
        .context("Failed to drop the existing schema")?;

    sqlx::raw_sql(SCHEMA_SQL)
        .execute(&mut *tx)
        .await
        .context("Failed to create the schema")?;

    sqlx::query("DELETE FROM schema_version")
        .execute(&mut *tx)
        .await
        .context("Failed to clear schema_version")?;

    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(target_ver)
        .execute(&mut *tx)
        .await
        .context("Failed to update schema_version")?;

    tx.commit()
        .await
        .context("Failed to commit migration transaction")?;

    debug!("Schema now at version {target_ver}");
    Ok(())
}
