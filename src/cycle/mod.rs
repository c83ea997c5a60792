//! Monitoring cycle orchestration.

pub mod controller;
pub mod types;

pub use controller::MonitorController;
pub use types::{MonitorError, MonitorState};
