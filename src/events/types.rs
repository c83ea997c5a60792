//! Event type definitions for real-time monitoring notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::LogLevel;
use crate::verify::{CheckStatus, LinkCheck};

/// Events emitted by the monitoring cycle for any subscribed listeners.
///
/// Delivery is best-effort: events carry everything a dashboard needs to
/// render a log line (message, level, timestamp) without querying the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MonitorEvent {
    /// A monitoring cycle has started.
    CycleStarted {
        timestamp: DateTime<Utc>,
    },
    /// Discovery finished for this cycle.
    LinksDiscovered {
        count: usize,
        pages_visited: u32,
        timestamp: DateTime<Utc>,
    },
    /// One link was verified and its result persisted.
    LinkChecked {
        url: String,
        status: CheckStatus,
        layout_ok: bool,
        pattern_ok: bool,
        elapsed_seconds: f64,
        timestamp: DateTime<Utc>,
    },
    /// The full discovery + verification pass completed.
    CycleCompleted {
        checked: usize,
        timestamp: DateTime<Utc>,
    },
    /// The monitor received a stop signal.
    MonitorStopped {
        timestamp: DateTime<Utc>,
    },
}

impl MonitorEvent {
    #[must_use]
    pub fn cycle_started() -> Self {
        Self::CycleStarted {
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn links_discovered(count: usize, pages_visited: u32) -> Self {
        Self::LinksDiscovered {
            count,
            pages_visited,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn link_checked(check: &LinkCheck) -> Self {
        Self::LinkChecked {
            url: check.url.clone(),
            status: check.status,
            layout_ok: check.layout_ok,
            pattern_ok: check.pattern_ok,
            elapsed_seconds: check.elapsed_seconds,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn cycle_completed(checked: usize) -> Self {
        Self::CycleCompleted {
            checked,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn monitor_stopped() -> Self {
        Self::MonitorStopped {
            timestamp: Utc::now(),
        }
    }

    /// Severity for display purposes. Only a failed link check is an error.
    #[must_use]
    pub fn level(&self) -> LogLevel {
        match self {
            Self::LinkChecked {
                status: CheckStatus::Error,
                ..
            } => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    /// Human-readable message for log streaming.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::CycleStarted { .. } => "Monitoring cycle started".to_string(),
            Self::LinksDiscovered {
                count,
                pages_visited,
                ..
            } => format!("Discovered {count} links across {pages_visited} pages"),
            Self::LinkChecked {
                url,
                status,
                elapsed_seconds,
                ..
            } => format!("{url} -> {status} ({elapsed_seconds:.2}s)"),
            Self::CycleCompleted { checked, .. } => {
                format!("Monitoring cycle completed, {checked} links checked")
            }
            Self::MonitorStopped { .. } => "Monitoring stopped".to_string(),
        }
    }

    /// When the event was produced.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::CycleStarted { timestamp }
            | Self::LinksDiscovered { timestamp, .. }
            | Self::LinkChecked { timestamp, .. }
            | Self::CycleCompleted { timestamp, .. }
            | Self::MonitorStopped { timestamp } => *timestamp,
        }
    }
}
