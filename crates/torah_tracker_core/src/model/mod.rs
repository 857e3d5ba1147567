//! Curriculum domain model.
//!
//! # Responsibility
//! - Define the category -> track -> unit tree persisted as one document.
//! - Own the JSON interchange shape and its per-track repair rules.
//!
//! # Invariants
//! - Every track keeps `completed.len() == units as usize`.
//! - Category ids are unique in a document; track ids are unique in their
//!   category.

pub mod document;
pub mod interchange;
