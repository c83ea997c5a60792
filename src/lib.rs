//! linkwatch: periodic link discovery and verification.
//!
//! A Discoverer paginates a listing page (statically or through a headless
//! browser) and accumulates a deduplicated set of detail-link URLs; a
//! Verifier probes each URL for reachability, coarse HTML structure, and
//! domain conformance; a controller repeats the pass on a fixed interval,
//! appending results to SQLite and streaming events to subscribers.

pub mod browser_setup;
pub mod config;
pub mod cycle;
pub mod discover;
pub mod events;
pub mod export;
pub mod store;
pub mod utils;
pub mod verify;

pub use browser_setup::{find_browser_executable, launch_browser};
pub use config::{DiscoveryMode, MonitorConfig};
pub use cycle::{MonitorController, MonitorError, MonitorState};
pub use discover::{DiscoveredLinks, discover};
pub use events::{EventBusError, MonitorEvent, MonitorEventBus};
pub use export::{export_csv, import_csv};
pub use store::{CheckRow, DashboardSummary, LinkStats, LinkStore, LogLevel};
pub use verify::{CheckStatus, LinkCheck, verify};
