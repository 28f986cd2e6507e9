//! HTTP handlers for the `/api/v1` surface.
//!
//! Handlers stay thin: they parse path and query input, call the catalog or
//! report service and wrap the result in [`crate::ApiResponse`].

pub mod catalog;
pub mod common;
pub mod reports;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
