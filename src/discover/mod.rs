//! Link discovery: paginate the listing page and accumulate a deduplicated
//! set of absolute detail-link URLs.
//!
//! Two strategies satisfy the same contract — plain HTTP fetching for static
//! listings, a headless browser session for client-rendered ones — selected
//! by configuration, never by forking the pipeline.

pub mod browser;
pub mod http;
pub mod js_scripts;

use std::collections::HashSet;

use tracing::{error, info};

use crate::config::{DiscoveryMode, MonitorConfig};
use crate::store::{LinkStore, LogLevel};

/// Outcome of one discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredLinks {
    /// Deduplicated absolute URLs, in no particular order.
    pub urls: HashSet<String>,
    /// Listing pages actually visited.
    pub pages_visited: u32,
}

/// A discovery run that terminated on an unrecoverable error, carrying
/// whatever had accumulated up to that point.
#[derive(Debug)]
pub(crate) struct DiscoveryFailure {
    pub partial: DiscoveredLinks,
    pub error: anyhow::Error,
}

/// Run discovery with the configured strategy.
///
/// Never raises to the caller: an unrecoverable fetch/render error stops
/// pagination, is recorded as an ERROR log entry, and the partial result is
/// returned. Partial results are acceptable and expected.
pub async fn discover(config: &MonitorConfig, store: &LinkStore) -> DiscoveredLinks {
    let outcome = match config.discovery_mode() {
        DiscoveryMode::Http => http::discover_pages(config).await,
        DiscoveryMode::Browser => browser::discover_pages(config).await,
    };

    match outcome {
        Ok(links) => {
            info!(
                links = links.urls.len(),
                pages = links.pages_visited,
                "link discovery finished"
            );
            links
        }
        Err(failure) => {
            error!(error = %failure.error, "link discovery terminated early");
            if let Err(log_err) = store
                .add_log(
                    LogLevel::Error,
                    &format!("Error during link discovery: {:#}", failure.error),
                )
                .await
            {
                error!(error = %log_err, "failed to record discovery error");
            }
            failure.partial
        }
    }
}

/// Insert a collected href into the set after trimming and validity checks.
/// Transient per-element garbage is skipped, never fatal.
pub(crate) fn accumulate(urls: &mut HashSet<String>, href: &str) {
    let href = href.trim();
    if crate::utils::is_valid_url(href) {
        urls.insert(href.to_string());
    }
}
