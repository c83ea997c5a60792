//! Shared default values for the monitoring pipeline.

/// Hard ceiling on pagination depth during discovery.
///
/// Bounds pathological listings that keep presenting a "next" control
/// (broken cursors, self-linking pagination widgets).
pub const DEFAULT_MAX_PAGES: u32 = 20;

/// Per-link HTTP timeout for verification, in seconds.
pub const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 10;

/// Page load / render timeout during discovery, in seconds.
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 10;

/// Interval between monitoring cycles, in seconds.
pub const DEFAULT_CYCLE_INTERVAL_SECS: u64 = 300;

/// Granularity at which the cycle loop re-checks its stop flag while
/// sleeping, in seconds. Stop requests take effect within roughly this long.
pub const STOP_POLL_SECS: u64 = 1;

/// Default CSS selector for detail links on the listing page.
pub const DEFAULT_LINK_SELECTOR: &str = "a.elementor-button-link";

/// Ordered "next page" selector candidates, evaluated in priority order.
///
/// Listing markup is inconsistent across deployments; the first candidate
/// yielding a visible, enabled control wins.
pub const DEFAULT_NEXT_SELECTORS: &[&str] = &[
    ".jet-filters-pagination__item.next",
    ".elementor-pagination .next",
    "a.next",
    ".next.page-numbers",
    ".pagination-next",
    "[aria-label='Next']",
    "[aria-label='Próximo']",
];

/// Delay after clicking a pagination control, in milliseconds, giving
/// client-rendered listings time to settle before re-reading anchors.
pub const PAGINATION_SETTLE_MS: u64 = 3000;

/// Delay after scrolling the next control into view, in milliseconds.
pub const SCROLL_SETTLE_MS: u64 = 1000;

/// Default location of the monitoring database.
pub const DEFAULT_DB_PATH: &str = "linkwatch.sqlite";

/// Default row cap for "latest checks" queries.
pub const DEFAULT_LATEST_LIMIT: usize = 100;

/// User agent for both the plain-HTTP client and the headless browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
