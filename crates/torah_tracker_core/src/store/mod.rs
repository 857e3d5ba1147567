//! Taxonomy store: the single owner of the in-memory document.
//!
//! # Responsibility
//! - Load the document from a persistence gateway (or seed defaults).
//! - Apply every mutation and write the document back after each one.
//! - Reject invalid management input before touching the document.
//!
//! # Invariants
//! - `completed.len() == units` holds for every track after any call.
//! - A failed persistence write never rolls back the in-memory mutation.

use crate::model::document::MAX_TRACK_UNITS;
use crate::model::interchange::DocumentError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod ids;
mod load;
pub mod taxonomy_store;

pub use load::{load_document, LoadOrigin, LoadedDocument};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store commands and queries.
#[derive(Debug)]
pub enum StoreError {
    /// Category name is blank after trim.
    EmptyName,
    /// Track title is blank after trim.
    EmptyTitle,
    /// Unit count is not in `1..=MAX_TRACK_UNITS`.
    InvalidUnits(i64),
    /// No category with this id.
    CategoryNotFound(String),
    /// No track with this id in the category.
    TrackNotFound {
        category_id: String,
        track_id: String,
    },
    /// Unit index outside `0..units`.
    UnitOutOfRange { index: u32, units: u32 },
    /// Import payload was rejected; the document is unchanged.
    Import(DocumentError),
    /// Document could not be serialized.
    Export(DocumentError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "category name must not be blank"),
            Self::EmptyTitle => write!(f, "track title must not be blank"),
            Self::InvalidUnits(value) => {
                write!(
                    f,
                    "unit count must be a positive integer no greater than {MAX_TRACK_UNITS}, got {value}"
                )
            }
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::TrackNotFound {
                category_id,
                track_id,
            } => write!(f, "track not found: {category_id}/{track_id}"),
            Self::UnitOutOfRange { index, units } => {
                write!(f, "unit index {index} out of range for {units} units")
            }
            Self::Import(err) => write!(f, "import rejected: {err}"),
            Self::Export(err) => write!(f, "export failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Import(err) | Self::Export(err) => Some(err),
            _ => None,
        }
    }
}

/// Converts a caller-supplied unit count, as typed into a form or flag.
///
/// # Errors
/// - `StoreError::InvalidUnits` unless `1 <= value <= MAX_TRACK_UNITS`.
pub fn unit_count(value: i64) -> StoreResult<u32> {
    u32::try_from(value)
        .ok()
        .filter(|units| (1..=MAX_TRACK_UNITS).contains(units))
        .ok_or(StoreError::InvalidUnits(value))
}

/// Outcome of the persistence write that follows a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    Saved,
    /// Write failed; the message is a non-fatal warning for the user.
    Failed(String),
}

impl PersistStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Result of an applied mutation plus its persistence outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit<T> {
    pub value: T,
    pub persist: PersistStatus,
}

impl<T> Commit<T> {
    /// Persistence warning, if the write failed.
    pub fn warning(&self) -> Option<&str> {
        match &self.persist {
            PersistStatus::Saved => None,
            PersistStatus::Failed(message) => Some(message.as_str()),
        }
    }
}
