//! Pagination, deduplication, and stop-condition behavior of the
//! plain-HTTP discovery strategy.

use linkwatch::config::MonitorConfig;
use linkwatch::discover::discover;
use linkwatch::store::{LinkStore, LogLevel};
use tempfile::TempDir;

fn listing_page(items: std::ops::Range<usize>, next: Option<&str>) -> String {
    let mut html = String::from("<html><head></head><body><ul>");
    for i in items {
        html.push_str(&format!(
            "<li><a class=\"detail\" href=\"/portfolio/item-{i}/\">Item {i}</a></li>"
        ));
    }
    html.push_str("</ul>");
    if let Some(href) = next {
        html.push_str(&format!("<a class=\"next\" href=\"{href}\">Next</a>"));
    }
    html.push_str("</body></html>");
    html
}

fn config_for(server_url: &str, max_pages: u32) -> MonitorConfig {
    MonitorConfig::builder()
        .listing_url(format!("{server_url}/listing/page/1/"))
        .expected_domain("127.0.0.1")
        .link_selector("a.detail")
        .next_selectors(vec!["a.next".to_string()])
        .max_pages(max_pages)
        .build()
        .expect("valid test config")
}

async fn open_store(dir: &TempDir) -> LinkStore {
    LinkStore::open(&dir.path().join("monitor.sqlite"))
        .await
        .expect("open store")
}

#[tokio::test]
async fn three_pages_of_ten_yield_thirty_urls() {
    let mut server = mockito::Server::new_async().await;
    let _p1 = server
        .mock("GET", "/listing/page/1/")
        .with_body(listing_page(0..10, Some("/listing/page/2/")))
        .create_async()
        .await;
    let _p2 = server
        .mock("GET", "/listing/page/2/")
        .with_body(listing_page(10..20, Some("/listing/page/3/")))
        .create_async()
        .await;
    let _p3 = server
        .mock("GET", "/listing/page/3/")
        .with_body(listing_page(20..30, None))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let config = config_for(&server.url(), 20);

    let links = discover(&config, &store).await;
    assert_eq!(links.pages_visited, 3);
    assert_eq!(links.urls.len(), 30);
    assert!(
        links
            .urls
            .contains(&format!("{}/portfolio/item-29/", server.url()))
    );
}

#[tokio::test]
async fn duplicate_hrefs_across_pages_are_deduplicated() {
    let mut server = mockito::Server::new_async().await;
    // Both pages list the same five items
    let _p1 = server
        .mock("GET", "/listing/page/1/")
        .with_body(listing_page(0..5, Some("/listing/page/2/")))
        .create_async()
        .await;
    let _p2 = server
        .mock("GET", "/listing/page/2/")
        .with_body(listing_page(0..5, None))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let config = config_for(&server.url(), 20);

    let links = discover(&config, &store).await;
    assert_eq!(links.pages_visited, 2);
    // Ten raw anchors collapse to five distinct URLs
    assert_eq!(links.urls.len(), 5);
}

#[tokio::test]
async fn max_pages_one_never_advances() {
    let mut server = mockito::Server::new_async().await;
    let _p1 = server
        .mock("GET", "/listing/page/1/")
        .with_body(listing_page(0..10, Some("/listing/page/2/")))
        .create_async()
        .await;
    let p2 = server
        .mock("GET", "/listing/page/2/")
        .with_body(listing_page(10..20, None))
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let config = config_for(&server.url(), 1);

    let links = discover(&config, &store).await;
    assert_eq!(links.pages_visited, 1);
    assert_eq!(links.urls.len(), 10);
    p2.assert_async().await;
}

#[tokio::test]
async fn missing_anchors_stop_pagination() {
    let mut server = mockito::Server::new_async().await;
    let _p1 = server
        .mock("GET", "/listing/page/1/")
        .with_body(listing_page(0..3, Some("/listing/page/2/")))
        .create_async()
        .await;
    // Page 2 renders no detail links even though a next control is present
    let _p2 = server
        .mock("GET", "/listing/page/2/")
        .with_body(listing_page(0..0, Some("/listing/page/3/")))
        .create_async()
        .await;
    let p3 = server
        .mock("GET", "/listing/page/3/")
        .with_body(listing_page(3..6, None))
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let config = config_for(&server.url(), 20);

    let links = discover(&config, &store).await;
    assert_eq!(links.pages_visited, 2);
    assert_eq!(links.urls.len(), 3);
    p3.assert_async().await;
}

#[tokio::test]
async fn fetch_failure_mid_run_returns_partial_results_and_logs() {
    let mut server = mockito::Server::new_async().await;
    let _p1 = server
        .mock("GET", "/listing/page/1/")
        .with_body(listing_page(0..10, Some("/listing/page/2/")))
        .create_async()
        .await;
    let _p2 = server
        .mock("GET", "/listing/page/2/")
        .with_status(500)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let config = config_for(&server.url(), 20);

    let links = discover(&config, &store).await;
    // Page 1 results survive the page 2 failure
    assert_eq!(links.urls.len(), 10);

    let logs = store.recent_logs(10).await.unwrap();
    assert!(
        logs.iter()
            .any(|l| l.level == LogLevel::Error && l.message.contains("link discovery"))
    );
}

#[tokio::test]
async fn unreachable_listing_yields_empty_set_and_error_log() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    // Nothing listens on port 9; discovery must degrade, not panic
    let config = MonitorConfig::builder()
        .listing_url("http://127.0.0.1:9/listing/")
        .expected_domain("127.0.0.1")
        .link_selector("a.detail")
        .build()
        .unwrap();

    let links = discover(&config, &store).await;
    assert!(links.urls.is_empty());

    let logs = store.recent_logs(10).await.unwrap();
    assert!(logs.iter().any(|l| l.level == LogLevel::Error));
}

#[tokio::test]
async fn invalid_link_selector_is_reported_as_error() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let config = MonitorConfig::builder()
        .listing_url("http://127.0.0.1:9/listing/")
        .expected_domain("127.0.0.1")
        .link_selector("][not-a-selector")
        .build()
        .unwrap();

    let links = discover(&config, &store).await;
    assert!(links.urls.is_empty());
    assert_eq!(links.pages_visited, 0);

    let logs = store.recent_logs(10).await.unwrap();
    assert!(
        logs.iter()
            .any(|l| l.level == LogLevel::Error && l.message.contains("selector"))
    );
}
