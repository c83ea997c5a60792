//! Error taxonomy for the monitoring pipeline.

use std::fmt;

/// Pipeline-boundary error classification.
///
/// None of these abort the monitor: transport and parse failures degrade the
/// affected operation, persistence failures lose at most one result, and
/// configuration failures surface as an ERROR log before sleep-and-retry.
#[derive(Debug, Clone)]
pub enum MonitorError {
    /// Configuration error (bad selector, unreachable base URL)
    Config(String),
    /// Network error (timeout, connection refused, DNS)
    Transport(String),
    /// Markup or selector resolution error
    Parse(String),
    /// Storage write failure
    Persistence(String),
    /// Operation cancelled by a stop signal
    Cancelled,
    /// Other errors
    Other(String),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Transport(msg) => write!(f, "Transport error: {msg}"),
            Self::Parse(msg) => write!(f, "Parse error: {msg}"),
            Self::Persistence(msg) => write!(f, "Persistence error: {msg}"),
            Self::Cancelled => write!(f, "Monitoring was cancelled"),
            Self::Other(msg) => write!(f, "Monitor error: {msg}"),
        }
    }
}

impl std::error::Error for MonitorError {}

impl From<anyhow::Error> for MonitorError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} preserves the full context chain
        Self::Other(format!("{err:#}"))
    }
}

/// Lifecycle state of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Running,
    Stopped,
}
