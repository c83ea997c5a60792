//! Browser-driven discovery strategy for client-rendered listings.
//!
//! Drives a headless Chrome session over CDP: collect anchors, locate and
//! click the "next" control via injected JS, wait for the listing to settle,
//! repeat. One session per discovery run, torn down on every exit path.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Page;
use tracing::debug;

use super::js_scripts::{
    CLICK_NEXT_SCRIPT, COLLECT_ANCHORS_SCRIPT, SCROLL_NEXT_INTO_VIEW_SCRIPT, with_selector,
    with_selectors,
};
use super::{DiscoveredLinks, DiscoveryFailure, accumulate};
use crate::browser_setup::{launch_browser, teardown_browser};
use crate::config::MonitorConfig;
use crate::utils::constants::{PAGINATION_SETTLE_MS, SCROLL_SETTLE_MS};

pub(super) async fn discover_pages(
    config: &MonitorConfig,
) -> Result<DiscoveredLinks, DiscoveryFailure> {
    let mut links = DiscoveredLinks::default();

    let (browser, handler_task, data_dir) = match launch_browser(config.headless()).await {
        Ok(session) => session,
        Err(error) => return Err(DiscoveryFailure { partial: links, error }),
    };

    let result = run_session(&browser, config, &mut links).await;

    // Teardown runs whether the session succeeded or not
    teardown_browser(browser, handler_task, data_dir).await;

    match result {
        Ok(()) => Ok(links),
        Err(error) => Err(DiscoveryFailure { partial: links, error }),
    }
}

async fn run_session(
    browser: &chromiumoxide::Browser,
    config: &MonitorConfig,
    links: &mut DiscoveredLinks,
) -> Result<()> {
    let timeout = config.page_load_timeout();

    let page = browser
        .new_page("about:blank")
        .await
        .context("Failed to open browser page")?;

    with_timeout(
        async {
            page.goto(config.listing_url())
                .await
                .map(|_| ())
                .context("Navigation failed")
        },
        timeout,
        "listing navigation",
    )
    .await?;
    with_timeout(
        async {
            page.wait_for_navigation()
                .await
                .map(|_| ())
                .context("Page load failed")
        },
        timeout,
        "listing load",
    )
    .await?;

    let anchors_script = with_selector(COLLECT_ANCHORS_SCRIPT, config.link_selector());
    let scroll_script = with_selectors(SCROLL_NEXT_INTO_VIEW_SCRIPT, config.next_selectors());
    let click_script = with_selectors(CLICK_NEXT_SCRIPT, config.next_selectors());

    loop {
        if links.pages_visited >= config.max_pages() {
            debug!(max_pages = config.max_pages(), "pagination ceiling reached");
            break;
        }
        links.pages_visited += 1;

        let hrefs: Vec<String> =
            with_timeout(evaluate(&page, &anchors_script), timeout, "anchor collection").await?;
        debug!(page = links.pages_visited, anchors = hrefs.len(), "listing page read");

        if hrefs.is_empty() {
            break;
        }
        for href in &hrefs {
            accumulate(&mut links.urls, href);
        }

        let found: bool =
            with_timeout(evaluate(&page, &scroll_script), timeout, "next control lookup").await?;
        if !found {
            break;
        }
        tokio::time::sleep(Duration::from_millis(SCROLL_SETTLE_MS)).await;

        let clicked: bool =
            with_timeout(evaluate(&page, &click_script), timeout, "next control click").await?;
        if !clicked {
            // Control disappeared between scroll and click; treat as the end
            // of the listing rather than an error.
            break;
        }
        tokio::time::sleep(Duration::from_millis(PAGINATION_SETTLE_MS)).await;
    }

    Ok(())
}

async fn evaluate<T: serde::de::DeserializeOwned>(page: &Page, script: &str) -> Result<T> {
    let result = page
        .evaluate(script)
        .await
        .context("Failed to evaluate script")?;
    let value = result
        .into_value::<serde_json::Value>()
        .context("Script returned no value")?;
    serde_json::from_value(value).context("Failed to parse script result")
}

/// Wrap a page operation with an explicit timeout so a wedged render can
/// never hang the discovery loop.
async fn with_timeout<F, T>(operation: F, timeout: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {} seconds",
            timeout.as_secs()
        )),
    }
}
