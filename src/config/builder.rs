//! Type-safe builder for `MonitorConfig` using the typestate pattern.
//!
//! The listing URL and the expected domain are required; the compiler
//! refuses to `build()` until both are set. Everything else has defaults.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;
use url::Url;

use super::types::{DiscoveryMode, MonitorConfig};
use crate::utils::constants::{
    DEFAULT_CHECK_TIMEOUT_SECS, DEFAULT_CYCLE_INTERVAL_SECS, DEFAULT_DB_PATH,
    DEFAULT_LINK_SELECTOR, DEFAULT_MAX_PAGES, DEFAULT_NEXT_SELECTORS,
    DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
};

// Type states for the builder
pub struct WithListingUrl;
pub struct Complete;

pub struct MonitorConfigBuilder<State = ()> {
    pub(crate) listing_url: Option<String>,
    pub(crate) expected_domain: Option<String>,
    pub(crate) link_selector: String,
    pub(crate) next_selectors: Vec<String>,
    pub(crate) max_pages: u32,
    pub(crate) check_timeout_secs: u64,
    pub(crate) page_load_timeout_secs: u64,
    pub(crate) cycle_interval_secs: u64,
    pub(crate) discovery_mode: DiscoveryMode,
    pub(crate) headless: bool,
    pub(crate) db_path: PathBuf,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for MonitorConfigBuilder<()> {
    fn default() -> Self {
        Self {
            listing_url: None,
            expected_domain: None,
            link_selector: DEFAULT_LINK_SELECTOR.to_string(),
            next_selectors: DEFAULT_NEXT_SELECTORS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_pages: DEFAULT_MAX_PAGES,
            check_timeout_secs: DEFAULT_CHECK_TIMEOUT_SECS,
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            cycle_interval_secs: DEFAULT_CYCLE_INTERVAL_SECS,
            discovery_mode: DiscoveryMode::Http,
            headless: true,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            _phantom: PhantomData,
        }
    }
}

impl MonitorConfig {
    /// Create a builder for configuring a `MonitorConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> MonitorConfigBuilder<()> {
        MonitorConfigBuilder::default()
    }
}

impl MonitorConfigBuilder<()> {
    pub fn listing_url(self, url: impl Into<String>) -> MonitorConfigBuilder<WithListingUrl> {
        let url_string = url.into();

        // Normalize: add https:// if no scheme is present
        let normalized =
            if url_string.starts_with("http://") || url_string.starts_with("https://") {
                url_string
            } else {
                format!("https://{url_string}")
            };

        MonitorConfigBuilder {
            listing_url: Some(normalized),
            expected_domain: self.expected_domain,
            link_selector: self.link_selector,
            next_selectors: self.next_selectors,
            max_pages: self.max_pages,
            check_timeout_secs: self.check_timeout_secs,
            page_load_timeout_secs: self.page_load_timeout_secs,
            cycle_interval_secs: self.cycle_interval_secs,
            discovery_mode: self.discovery_mode,
            headless: self.headless,
            db_path: self.db_path,
            _phantom: PhantomData,
        }
    }
}

impl MonitorConfigBuilder<WithListingUrl> {
    pub fn expected_domain(self, domain: impl Into<String>) -> MonitorConfigBuilder<Complete> {
        MonitorConfigBuilder {
            listing_url: self.listing_url,
            expected_domain: Some(domain.into().trim().to_lowercase()),
            link_selector: self.link_selector,
            next_selectors: self.next_selectors,
            max_pages: self.max_pages,
            check_timeout_secs: self.check_timeout_secs,
            page_load_timeout_secs: self.page_load_timeout_secs,
            cycle_interval_secs: self.cycle_interval_secs,
            discovery_mode: self.discovery_mode,
            headless: self.headless,
            db_path: self.db_path,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl MonitorConfigBuilder<Complete> {
    pub fn build(self) -> Result<MonitorConfig> {
        let listing_url = self
            .listing_url
            .ok_or_else(|| anyhow!("listing_url is required"))?;
        let expected_domain = self
            .expected_domain
            .ok_or_else(|| anyhow!("expected_domain is required"))?;

        // Fail here rather than on the first cycle
        Url::parse(&listing_url)
            .map_err(|e| anyhow!("Invalid listing URL '{listing_url}': {e}"))?;

        if expected_domain.is_empty() {
            return Err(anyhow!("expected_domain must not be empty"));
        }
        if self.next_selectors.is_empty() {
            return Err(anyhow!("at least one next-page selector is required"));
        }

        Ok(MonitorConfig {
            listing_url,
            expected_domain,
            link_selector: self.link_selector,
            next_selectors: self.next_selectors,
            max_pages: self.max_pages,
            check_timeout_secs: self.check_timeout_secs,
            page_load_timeout_secs: self.page_load_timeout_secs,
            cycle_interval_secs: self.cycle_interval_secs,
            discovery_mode: self.discovery_mode,
            headless: self.headless,
            db_path: self.db_path,
        })
    }
}

// Builder methods available at any state
impl<State> MonitorConfigBuilder<State> {
    /// Override the detail-link selector.
    #[must_use]
    pub fn link_selector(mut self, selector: impl Into<String>) -> Self {
        self.link_selector = selector.into();
        self
    }

    /// Replace the ordered next-page selector candidates.
    #[must_use]
    pub fn next_selectors(mut self, selectors: Vec<String>) -> Self {
        self.next_selectors = selectors;
        self
    }

    /// Cap pagination depth per discovery run.
    #[must_use]
    pub fn max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages;
        self
    }

    /// Per-link HTTP timeout for verification, in seconds.
    #[must_use]
    pub fn check_timeout_secs(mut self, secs: u64) -> Self {
        self.check_timeout_secs = secs;
        self
    }

    /// Page load / render timeout during discovery, in seconds.
    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.page_load_timeout_secs = secs;
        self
    }

    /// Seconds between monitoring cycles.
    #[must_use]
    pub fn cycle_interval_secs(mut self, secs: u64) -> Self {
        self.cycle_interval_secs = secs;
        self
    }

    /// Select the discovery strategy.
    #[must_use]
    pub fn discovery_mode(mut self, mode: DiscoveryMode) -> Self {
        self.discovery_mode = mode;
        self
    }

    /// Run the browser with a visible window (Browser mode only).
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Location of the monitoring database.
    #[must_use]
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }
}
