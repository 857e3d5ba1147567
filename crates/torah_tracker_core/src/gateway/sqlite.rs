//! SQLite-backed gateway over the `kv_store` table.
//!
//! # Responsibility
//! - Open file or in-memory databases and create the blob table on first use.
//! - Read and upsert string values by key.
//!
//! # Invariants
//! - The table layout version is mirrored in `PRAGMA user_version`.
//! - Files stamped with a newer version are refused, never rewritten.
//! - `set` is an upsert; the last write wins.

use super::{GatewayError, GatewayResult, PersistenceGateway};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// Version stamped into `user_version` once `kv_store` exists.
pub const KV_STORE_VERSION: u32 = 1;

const CREATE_KV_STORE: &str = "
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable gateway owning one SQLite connection.
pub struct SqliteGateway {
    conn: Connection,
}

impl SqliteGateway {
    /// Opens (creating if needed) a database file holding the document.
    ///
    /// # Side effects
    /// - Creates the file and the `kv_store` table when missing.
    /// - Emits `db_open` events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> GatewayResult<Self> {
        open_logged("file", || Connection::open(path))
    }

    pub fn open_in_memory() -> GatewayResult<Self> {
        open_logged("memory", Connection::open_in_memory)
    }

    /// Wraps an existing connection, creating `kv_store` if it is absent.
    ///
    /// # Errors
    /// - `UnsupportedSchemaVersion` when the file carries a newer stamp.
    pub fn from_connection(mut conn: Connection) -> GatewayResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let found = stamped_version(&conn)?;
        if found > KV_STORE_VERSION {
            return Err(GatewayError::UnsupportedSchemaVersion {
                found,
                supported: KV_STORE_VERSION,
            });
        }
        if found < KV_STORE_VERSION {
            let tx = conn.transaction()?;
            tx.execute_batch(CREATE_KV_STORE)?;
            tx.pragma_update(None, "user_version", KV_STORE_VERSION)?;
            tx.commit()?;
        }
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn open_logged(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> GatewayResult<SqliteGateway> {
    let started_at = Instant::now();
    let result = open()
        .map_err(GatewayError::from)
        .and_then(SqliteGateway::from_connection);
    match &result {
        Ok(_) => info!(
            "event=db_open module=gateway status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=gateway status=error mode={mode} duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn stamped_version(conn: &Connection) -> GatewayResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

impl PersistenceGateway for SqliteGateway {
    fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> GatewayResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}
