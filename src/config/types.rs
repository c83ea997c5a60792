//! Core configuration types for the monitoring pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::constants::{
    DEFAULT_CHECK_TIMEOUT_SECS, DEFAULT_CYCLE_INTERVAL_SECS, DEFAULT_DB_PATH,
    DEFAULT_LINK_SELECTOR, DEFAULT_MAX_PAGES, DEFAULT_NEXT_SELECTORS,
    DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
};

/// How the Discoverer loads listing pages.
///
/// Both strategies satisfy the same contract (a parsed listing document per
/// page); `Browser` is for listings whose links are client-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// Plain reqwest GET + static HTML parsing.
    Http,
    /// Headless Chrome session driven over CDP.
    Browser,
}

impl Default for DiscoveryMode {
    fn default() -> Self {
        Self::Http
    }
}

/// Configuration for one monitoring pipeline instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// The paginated listing page links are discovered from.
    pub(crate) listing_url: String,

    /// Canonical domain the monitored links are expected to live on.
    /// Subdomains of this domain also count as conforming.
    pub(crate) expected_domain: String,

    /// CSS selector matching detail links on the listing page.
    #[serde(default = "default_link_selector")]
    pub(crate) link_selector: String,

    /// Ordered "next page" selector candidates, highest priority first.
    #[serde(default = "default_next_selectors")]
    pub(crate) next_selectors: Vec<String>,

    /// Hard ceiling on pages visited per discovery run.
    #[serde(default = "default_max_pages")]
    pub(crate) max_pages: u32,

    #[serde(default = "default_check_timeout_secs")]
    pub(crate) check_timeout_secs: u64,

    #[serde(default = "default_page_load_timeout_secs")]
    pub(crate) page_load_timeout_secs: u64,

    /// Seconds between monitoring cycles.
    #[serde(default = "default_cycle_interval_secs")]
    pub(crate) cycle_interval_secs: u64,

    #[serde(default)]
    pub(crate) discovery_mode: DiscoveryMode,

    /// Run the browser headless. Only meaningful in `Browser` mode.
    #[serde(default = "default_headless")]
    pub(crate) headless: bool,

    #[serde(default = "default_db_path")]
    pub(crate) db_path: PathBuf,
}

fn default_link_selector() -> String {
    DEFAULT_LINK_SELECTOR.to_string()
}

fn default_next_selectors() -> Vec<String> {
    DEFAULT_NEXT_SELECTORS.iter().map(|s| (*s).to_string()).collect()
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_check_timeout_secs() -> u64 {
    DEFAULT_CHECK_TIMEOUT_SECS
}

fn default_page_load_timeout_secs() -> u64 {
    DEFAULT_PAGE_LOAD_TIMEOUT_SECS
}

fn default_cycle_interval_secs() -> u64 {
    DEFAULT_CYCLE_INTERVAL_SECS
}

fn default_headless() -> bool {
    true
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}
