//! API module
//!
//! Read-only HTTP reporting surface over the materialized statistics.

pub mod routes;

pub use routes::{create_router, AppState};
