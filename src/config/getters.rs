//! Read accessors for `MonitorConfig`.

use std::path::Path;
use std::time::Duration;

use super::types::{DiscoveryMode, MonitorConfig};

impl MonitorConfig {
    #[must_use]
    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    #[must_use]
    pub fn expected_domain(&self) -> &str {
        &self.expected_domain
    }

    #[must_use]
    pub fn link_selector(&self) -> &str {
        &self.link_selector
    }

    #[must_use]
    pub fn next_selectors(&self) -> &[String] {
        &self.next_selectors
    }

    #[must_use]
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    #[must_use]
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    #[must_use]
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    #[must_use]
    pub fn cycle_interval_secs(&self) -> u64 {
        self.cycle_interval_secs
    }

    #[must_use]
    pub fn discovery_mode(&self) -> DiscoveryMode {
        self.discovery_mode
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
