//! Controller lifecycle and full-cycle integration over mock HTTP fixtures.

use std::sync::Arc;
use std::time::Duration;

use linkwatch::config::MonitorConfig;
use linkwatch::cycle::{MonitorController, MonitorState};
use linkwatch::events::{MonitorEvent, MonitorEventBus};
use linkwatch::store::{LinkStore, LogLevel};
use linkwatch::verify::CheckStatus;
use tempfile::TempDir;
use tokio::time::timeout;

async fn open_store(dir: &TempDir) -> LinkStore {
    LinkStore::open(&dir.path().join("monitor.sqlite"))
        .await
        .expect("open store")
}

fn controller_for(
    config: MonitorConfig,
    store: LinkStore,
) -> (Arc<MonitorController>, Arc<MonitorEventBus>) {
    let events = Arc::new(MonitorEventBus::new(64));
    let controller = Arc::new(MonitorController::new(config, store, events.clone()));
    (controller, events)
}

#[tokio::test]
async fn full_cycle_discovers_verifies_and_persists() {
    let mut server = mockito::Server::new_async().await;
    let _listing = server
        .mock("GET", "/listing/")
        .with_body(
            "<html><head></head><body>\
             <a class=\"detail\" href=\"/item/ok/\">ok</a>\
             <a class=\"detail\" href=\"/item/gone/\">gone</a>\
             </body></html>",
        )
        .create_async()
        .await;
    let _ok = server
        .mock("GET", "/item/ok/")
        .with_body("<html><head></head><body>fine</body></html>")
        .create_async()
        .await;
    let _gone = server
        .mock("GET", "/item/gone/")
        .with_status(404)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let config = MonitorConfig::builder()
        .listing_url(format!("{}/listing/", server.url()))
        .expected_domain("127.0.0.1")
        .link_selector("a.detail")
        .check_timeout_secs(5)
        .build()
        .unwrap();

    let (controller, events) = controller_for(config, store);
    let mut receiver = events.subscribe();

    controller.run_cycle().await;

    // Both links persisted, one row each
    let rows = controller.store().latest_checks(10).await.unwrap();
    assert_eq!(rows.len(), 2);

    let summary = controller.store().dashboard_summary().await.unwrap();
    assert_eq!(summary.total_links, 2);
    assert_eq!(summary.status_counts.get("200"), Some(&1));
    assert_eq!(summary.status_counts.get("404"), Some(&1));

    // Re-running resolves the same identities instead of duplicating links
    controller.run_cycle().await;
    let summary = controller.store().dashboard_summary().await.unwrap();
    assert_eq!(summary.total_links, 2);

    // Lifecycle events streamed in order for the first cycle
    let mut seen = Vec::new();
    while let Ok(Ok(event)) = timeout(Duration::from_millis(100), receiver.recv()).await {
        seen.push(event);
        if seen.len() >= 5 {
            break;
        }
    }
    assert!(matches!(seen[0], MonitorEvent::CycleStarted { .. }));
    assert!(matches!(
        seen[1],
        MonitorEvent::LinksDiscovered { count: 2, .. }
    ));
    assert!(matches!(seen[2], MonitorEvent::LinkChecked { .. }));
    assert!(matches!(seen[3], MonitorEvent::LinkChecked { .. }));
    assert!(matches!(seen[4], MonitorEvent::CycleCompleted { checked: 2, .. }));
}

#[tokio::test]
async fn one_bad_link_does_not_abort_the_batch() {
    let mut server = mockito::Server::new_async().await;
    let _listing = server
        .mock("GET", "/listing/")
        .with_body(
            "<html><head></head><body>\
             <a class=\"detail\" href=\"http://127.0.0.1:9/dead/\">dead</a>\
             <a class=\"detail\" href=\"/item/ok/\">ok</a>\
             </body></html>",
        )
        .create_async()
        .await;
    let _ok = server
        .mock("GET", "/item/ok/")
        .with_body("<html><head></head><body>fine</body></html>")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let config = MonitorConfig::builder()
        .listing_url(format!("{}/listing/", server.url()))
        .expected_domain("127.0.0.1")
        .link_selector("a.detail")
        .check_timeout_secs(2)
        .build()
        .unwrap();

    let (controller, _events) = controller_for(config, store);
    controller.run_cycle().await;

    let rows = controller.store().latest_checks(10).await.unwrap();
    assert_eq!(rows.len(), 2);

    let dead = rows
        .iter()
        .find(|r| r.url.contains(":9/"))
        .expect("dead link recorded");
    assert_eq!(dead.status, CheckStatus::Error);
    let ok = rows
        .iter()
        .find(|r| r.url.contains("/item/ok/"))
        .expect("live link recorded");
    assert_eq!(ok.status, CheckStatus::Http(200));
}

#[tokio::test]
async fn start_is_idempotent_and_stop_takes_effect_promptly() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    // Unreachable listing keeps cycles short; long interval exercises the
    // interruptible sleep
    let config = MonitorConfig::builder()
        .listing_url("http://127.0.0.1:9/listing/")
        .expected_domain("127.0.0.1")
        .cycle_interval_secs(300)
        .check_timeout_secs(2)
        .build()
        .unwrap();

    let (controller, _events) = controller_for(config, store);
    assert_eq!(controller.state(), MonitorState::Stopped);

    assert!(controller.start().await);
    assert_eq!(controller.state(), MonitorState::Running);
    // Second start is a no-op
    assert!(!controller.start().await);

    // Give the loop time to finish its first pass and enter the sleep
    tokio::time::sleep(Duration::from_millis(1500)).await;

    // Stop must land within the 1s poll granularity, not the 300s interval
    timeout(Duration::from_secs(5), controller.stop())
        .await
        .expect("stop within poll granularity");
    assert_eq!(controller.state(), MonitorState::Stopped);

    let logs = controller.store().recent_logs(20).await.unwrap();
    assert!(
        logs.iter()
            .any(|l| l.level == LogLevel::Info && l.message == "Monitoring stopped")
    );

    // Stopping again is a no-op
    controller.stop().await;
    assert_eq!(controller.state(), MonitorState::Stopped);
}
