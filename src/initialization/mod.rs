//! Resource initialization.
//!
//! This module provides functions to initialize shared resources:
//! - The HTTP client (with its bounded timeout)
//! - The logger
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
