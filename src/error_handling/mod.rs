//! Error handling.
//!
//! Typed errors for each failure domain:
//! - **Initialization**: logger and HTTP client construction
//! - **Resolution**: provider transport, quota, and data-quality failures
//! - **Persistence**: record-store SQL and migration failures
//! - **Tracking**: the combined best-effort session flow

mod types;

// Re-export public API
pub use types::{InitializationError, ResolveError, StoreError, TrackError};
