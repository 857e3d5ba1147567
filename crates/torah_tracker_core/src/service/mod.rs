//! Screen-level use-case service.
//!
//! # Responsibility
//! - Combine store, progress and label conventions into screen models.
//! - Forward view commands to the taxonomy store.
//!
//! # Invariants
//! - Service APIs never bypass store validation/persistence contracts.
//! - Service layer stays storage-agnostic (generic over the gateway).

pub mod screens;
pub mod tracker_service;
