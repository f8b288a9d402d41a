//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, and per-connection
//! configuration for SQLite databases.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// In-memory database URL. Every connection to it sees a separate database,
/// so pools over it are limited to one connection.
pub const MEMORY_URL: &str = ":memory:";

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Type alias for a connection checked out of a [`DbPool`].
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite journal mode applied when a store is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    /// Write-ahead log; readers do not block the writer.
    #[default]
    Wal,
    /// Rollback journal deleted after each transaction.
    Delete,
}

impl JournalMode {
    #[must_use]
    pub const fn as_pragma(self) -> &'static str {
        match self {
            JournalMode::Wal => "WAL",
            JournalMode::Delete => "DELETE",
        }
    }
}

impl fmt::Display for JournalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_pragma())
    }
}

impl FromStr for JournalMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wal" => Ok(JournalMode::Wal),
            "delete" => Ok(JournalMode::Delete),
            other => Err(format!("unknown journal mode '{other}'")),
        }
    }
}

/// Pool and connection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub pool_size: u32,
    pub busy_timeout: Duration,
    pub journal_mode: JournalMode,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            pool_size: 5,
            busy_timeout: Duration::from_millis(5000),
            journal_mode: JournalMode::Wal,
        }
    }
}

/// Applies pragmas to every connection the pool hands out.
#[derive(Debug)]
struct SqliteCustomizer {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqliteCustomizer {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        configure_sqlite_connection(conn, self.busy_timeout).map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for the given database URL.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str, options: &ConnectionOptions) -> Result<DbPool> {
    let max_size = if database_url == MEMORY_URL {
        1
    } else {
        options.pool_size.max(1)
    };

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqliteCustomizer {
            busy_timeout: options.busy_timeout,
        }))
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Storage(e.to_string()))?;
    Ok(())
}

/// Switch the database file to the given journal mode. The setting persists
/// in the file, so this runs once when a store is opened.
///
/// # Errors
/// Returns an error if the pragma fails to apply.
pub fn set_journal_mode(pool: &DbPool, mode: JournalMode) -> Result<()> {
    let mut conn = pool.get()?;
    diesel::sql_query(format!("PRAGMA journal_mode={}", mode.as_pragma())).execute(&mut conn)?;
    Ok(())
}

/// Configure SQLite connection pragmas used by every store operation.
///
/// # Errors
/// Returns an error if a pragma fails to apply.
pub fn configure_sqlite_connection(
    conn: &mut SqliteConnection,
    busy_timeout: Duration,
) -> QueryResult<()> {
    diesel::sql_query(format!("PRAGMA busy_timeout={}", busy_timeout.as_millis())).execute(conn)?;
    diesel::sql_query("PRAGMA foreign_keys=ON").execute(conn)?;
    Ok(())
}
