//! FFI surface exposed to the Flutter shell.
//! Thin adapter over `torah_tracker_core`; no domain rules live here.

pub mod api;
pub mod route;
