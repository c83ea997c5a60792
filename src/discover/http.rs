//! Plain-HTTP discovery strategy: fetch listing pages with reqwest and
//! parse them statically with scraper.

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::{DiscoveredLinks, DiscoveryFailure, accumulate};
use crate::config::MonitorConfig;
use crate::utils::constants::BROWSER_USER_AGENT;
use crate::utils::resolve_href;

pub(super) async fn discover_pages(
    config: &MonitorConfig,
) -> Result<DiscoveredLinks, DiscoveryFailure> {
    let mut links = DiscoveredLinks::default();

    // An unparseable selector is a configuration error, surfaced before any
    // fetch happens.
    let link_selector = match Selector::parse(config.link_selector()) {
        Ok(sel) => sel,
        Err(e) => {
            return Err(DiscoveryFailure {
                partial: links,
                error: anyhow!("Invalid link selector '{}': {e}", config.link_selector()),
            });
        }
    };

    let client = match Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(config.page_load_timeout())
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return Err(DiscoveryFailure {
                partial: links,
                error: anyhow::Error::new(e).context("Failed to build discovery client"),
            });
        }
    };

    let mut current = config.listing_url().to_string();

    loop {
        if links.pages_visited >= config.max_pages() {
            debug!(max_pages = config.max_pages(), "pagination ceiling reached");
            break;
        }

        let page = match fetch_page(&client, &current).await {
            Ok(page) => page,
            Err(error) => return Err(DiscoveryFailure { partial: links, error }),
        };
        links.pages_visited += 1;

        let base = match Url::parse(&current) {
            Ok(base) => base,
            Err(e) => {
                return Err(DiscoveryFailure {
                    partial: links,
                    error: anyhow!("Invalid page URL '{current}': {e}"),
                });
            }
        };

        let document = Html::parse_document(&page);
        let mut anchors = 0usize;
        for element in document.select(&link_selector) {
            anchors += 1;
            if let Some(href) = element.value().attr("href")
                && let Some(absolute) = resolve_href(&base, href)
            {
                accumulate(&mut links.urls, &absolute);
            }
        }
        debug!(page = links.pages_visited, anchors, "listing page parsed");

        if anchors == 0 {
            break;
        }

        match next_page_href(&document, config.next_selectors(), &base) {
            // A next control pointing at the current page would loop forever
            Some(next) if next != current => current = next,
            _ => break,
        }
    }

    Ok(links)
}

async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch listing page {url}"))?;
    let response = response
        .error_for_status()
        .with_context(|| format!("Listing page {url} returned an error status"))?;
    response
        .text()
        .await
        .with_context(|| format!("Failed to read listing page {url}"))
}

/// Resolve the next-page URL from the ordered selector candidates.
///
/// Static HTML carries no computed visibility, so "visible and enabled" is
/// approximated as "has an href and is not marked disabled". Candidates that
/// fail to parse as selectors are skipped.
fn next_page_href(document: &Html, candidates: &[String], base: &Url) -> Option<String> {
    for candidate in candidates {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        for element in document.select(&selector) {
            let value = element.value();
            if value.attr("disabled").is_some()
                || value.attr("aria-disabled") == Some("true")
                || value.classes().any(|c| c == "disabled")
            {
                continue;
            }
            if let Some(href) = value.attr("href")
                && let Some(next) = resolve_href(base, href)
            {
                return Some(next);
            }
        }
    }
    None
}
