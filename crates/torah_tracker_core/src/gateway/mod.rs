//! Key-value persistence gateway for the document blob.
//!
//! # Responsibility
//! - Define the storage contract the taxonomy store writes through.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - The whole document lives under one fixed key (`DOCUMENT_KEY`).
//! - Gateways store opaque strings; they never interpret the blob.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

/// Storage key holding the serialized document.
pub const DOCUMENT_KEY: &str = "torahTrackerData";

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced by gateway implementations.
#[derive(Debug)]
pub enum GatewayError {
    /// SQLite open, query or write failure.
    Sqlite(rusqlite::Error),
    /// The database file was written by a newer build with a different blob table.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// Backend refused the write (quota, read-only medium, ...).
    WriteRejected(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "document store schema {found} is newer than supported {supported}"
            ),
            Self::WriteRejected(reason) => write!(f, "storage rejected write: {reason}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::WriteRejected(_) => None,
        }
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Opaque string store keyed by name.
pub trait PersistenceGateway {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> GatewayResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> GatewayResult<()>;
}
