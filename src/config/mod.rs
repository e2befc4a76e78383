//! Configuration module.
//!
//! Operational constants and the configuration structs for the guard,
//! the resolver, and the detection thresholds.

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::{DetectionThresholds, GuardConfig, LogFormat, LogLevel, ResolverConfig};
