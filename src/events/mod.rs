//! Real-time event publishing for dashboard log streaming.

pub mod bus;
pub mod errors;
pub mod types;

pub use bus::{MonitorEventBus, map_recv_error};
pub use errors::EventBusError;
pub use types::MonitorEvent;
