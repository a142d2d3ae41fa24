//! SQLite pool
//!
//! A file-backed pool for the server and a single-connection in-memory
//! pool for tests. Both run the same init pragmas.

use std::path::Path;
use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("connection pool error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0} row missing after write")]
    MissingAfterWrite(&'static str),
}

pub type DbResult<T> = Result<T, DbError>;

/// Pool size for the file-backed store; tool calls are short and serial
const FILE_POOL_SIZE: u32 = 4;

/// WAL lets readers run while a tool call writes
const FILE_PRAGMAS: &str = "PRAGMA foreign_keys = ON;
     PRAGMA journal_mode = WAL;
     PRAGMA synchronous = NORMAL;";

const MEMORY_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl Database {
    /// Open (or create) the store at `path`; migrations are left to the caller
    pub fn new<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(|conn| conn.execute_batch(FILE_PRAGMAS));
        Self::from_manager(manager, FILE_POOL_SIZE)
    }

    /// Private in-memory store with migrations applied
    ///
    /// Each in-memory connection is its own database, so the pool holds
    /// exactly one. Closures passed to `with_conn` must not nest.
    pub fn open_in_memory() -> DbResult<Self> {
        let manager =
            SqliteConnectionManager::memory().with_init(|conn| conn.execute_batch(MEMORY_PRAGMAS));
        let db = Self::from_manager(manager, 1)?;
        db.with_conn(super::migrations::run_migrations)?;
        Ok(db)
    }

    fn from_manager(manager: SqliteConnectionManager, max_size: u32) -> DbResult<Self> {
        let pool = Pool::builder().max_size(max_size).build(manager)?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Run `f` on a pooled connection
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.pool.get()?;
        f(&conn)
    }
}
