//! Configuration for the monitoring pipeline.
//!
//! This module provides the `MonitorConfig` struct and its type-safe builder
//! with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, MonitorConfigBuilder, WithListingUrl};
pub use types::{DiscoveryMode, MonitorConfig};
