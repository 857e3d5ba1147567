//! Core domain logic for the Torah study tracker.
//! This crate is the single source of truth for curriculum invariants.

pub mod gateway;
pub mod label;
pub mod logging;
pub mod model;
pub mod numeral;
pub mod progress;
pub mod service;
pub mod store;

pub use gateway::memory::MemoryGateway;
pub use gateway::sqlite::SqliteGateway;
pub use gateway::{GatewayError, GatewayResult, PersistenceGateway, DOCUMENT_KEY};
pub use label::{LabelConfigError, LabelConvention, LabelConventions, UnitKind};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{Category, CategoryId, Document, Track, TrackId, MAX_TRACK_UNITS};
pub use model::interchange::{default_document, export_document, parse_document, DocumentError};
pub use numeral::{format_numeral, hebrew_numeral, NumberingScheme};
pub use progress::{category_progress, document_progress, track_progress, Progress};
pub use service::screens::{
    CategoryCard, CategoryScreen, HomeScreen, ManagedCategory, ManagedTrack, TrackCard,
    TrackScreen, UnitRow,
};
pub use service::tracker_service::TrackerService;
pub use store::ids::ROUTE_SEPARATOR;
pub use store::taxonomy_store::{ImportSummary, TaxonomyStore};
pub use store::{unit_count, Commit, LoadOrigin, PersistStatus, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
