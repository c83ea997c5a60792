//! Event bus publish/subscribe behavior and event rendering.

use std::time::Duration;

use linkwatch::events::{EventBusError, MonitorEvent, MonitorEventBus};
use linkwatch::store::LogLevel;
use linkwatch::verify::{CheckStatus, LinkCheck};
use tokio::time::timeout;

fn failed_check() -> LinkCheck {
    LinkCheck {
        url: "https://example.com/down".to_string(),
        status: CheckStatus::Error,
        layout_ok: false,
        pattern_ok: false,
        elapsed_seconds: 10.0,
    }
}

#[tokio::test]
async fn publish_with_no_subscribers_is_reported() {
    let bus = MonitorEventBus::new(16);
    assert_eq!(bus.subscriber_count(), 0);
    assert!(!bus.has_subscribers());

    let result = bus.publish(MonitorEvent::cycle_started());
    assert!(matches!(result, Err(EventBusError::NoSubscribers)));
}

#[tokio::test]
async fn subscribers_receive_published_events() {
    let bus = MonitorEventBus::new(16);
    let mut receiver = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 1);

    let delivered = bus
        .publish(MonitorEvent::links_discovered(12, 3))
        .expect("delivery with one subscriber");
    assert_eq!(delivered, 1);

    let received = timeout(Duration::from_millis(100), receiver.recv())
        .await
        .expect("no timeout")
        .expect("event received");

    match received {
        MonitorEvent::LinksDiscovered {
            count,
            pages_visited,
            ..
        } => {
            assert_eq!(count, 12);
            assert_eq!(pages_visited, 3);
        }
        other => panic!("Unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn every_subscriber_sees_each_event() {
    let bus = MonitorEventBus::new(16);
    let mut first = bus.subscribe();
    let mut second = bus.subscribe();

    let delivered = bus.publish(MonitorEvent::cycle_completed(5)).unwrap();
    assert_eq!(delivered, 2);

    for receiver in [&mut first, &mut second] {
        let event = timeout(Duration::from_millis(100), receiver.recv())
            .await
            .expect("no timeout")
            .expect("event received");
        assert!(matches!(event, MonitorEvent::CycleCompleted { checked: 5, .. }));
    }
}

#[test]
fn events_render_level_and_message() {
    let started = MonitorEvent::cycle_started();
    assert_eq!(started.level(), LogLevel::Info);
    assert_eq!(started.message(), "Monitoring cycle started");

    let checked = MonitorEvent::link_checked(&failed_check());
    assert_eq!(checked.level(), LogLevel::Error);
    assert!(checked.message().contains("https://example.com/down"));
    assert!(checked.message().contains("error"));

    let stopped = MonitorEvent::monitor_stopped();
    assert_eq!(stopped.level(), LogLevel::Info);
    assert_eq!(stopped.message(), "Monitoring stopped");
}

#[test]
fn events_serialize_with_distinct_status_tags() {
    let event = MonitorEvent::link_checked(&failed_check());
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"error\""));
}
