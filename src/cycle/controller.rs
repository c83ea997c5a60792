//! The monitoring cycle: a controller owning RUNNING/STOPPED state and the
//! repeating discover → verify → persist loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::types::{MonitorError, MonitorState};
use crate::config::MonitorConfig;
use crate::discover::discover;
use crate::events::{MonitorEvent, MonitorEventBus};
use crate::store::{LinkStore, LogLevel};
use crate::utils::constants::STOP_POLL_SECS;
use crate::verify::{LinkCheck, build_client, verify};

/// Owns the monitoring loop and its lifecycle state.
///
/// Initial state is STOPPED. `start` spawns the cycle loop; `stop` flips a
/// cooperative flag the loop re-checks once per second while sleeping, so
/// stop requests take effect within roughly a second rather than waiting
/// out the full interval. An in-progress check batch finishes naturally,
/// bounded by its own per-request timeouts.
pub struct MonitorController {
    config: MonitorConfig,
    store: LinkStore,
    events: Arc<MonitorEventBus>,
    running: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl MonitorController {
    #[must_use]
    pub fn new(config: MonitorConfig, store: LinkStore, events: Arc<MonitorEventBus>) -> Self {
        Self {
            config,
            store,
            events,
            running: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        if self.running.load(Ordering::SeqCst) {
            MonitorState::Running
        } else {
            MonitorState::Stopped
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == MonitorState::Running
    }

    /// Transition to RUNNING and spawn the cycle loop.
    ///
    /// Returns false if the monitor was already running (idempotent).
    pub async fn start(self: &Arc<Self>) -> bool {
        if self.running.swap(true, Ordering::SeqCst) {
            return false;
        }

        info!("monitoring started");
        let controller = Arc::clone(self);
        let handle = tokio::spawn(async move { controller.run_loop().await });
        *self.handle.lock().await = Some(handle);
        true
    }

    /// Transition to STOPPED and wait for the loop to wind down.
    ///
    /// Idempotent; emits the final log entry and stop event once.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        info!("monitoring stop requested");
        if let Err(e) = self.store.add_log(LogLevel::Info, "Monitoring stopped").await {
            error!(error = %e, "failed to record stop notification");
        }
        let _ = self.events.publish(MonitorEvent::monitor_stopped());

        if let Some(handle) = self.handle.lock().await.take()
            && let Err(e) = handle.await
        {
            error!(error = %e, "monitor loop ended abnormally");
        }
    }

    async fn run_loop(&self) {
        while self.running.load(Ordering::SeqCst) {
            self.run_cycle().await;

            // Interruptible sleep: re-check the stop flag every second
            for _ in 0..self.config.cycle_interval_secs() {
                if !self.running.load(Ordering::SeqCst) {
                    break;
                }
                tokio::time::sleep(Duration::from_secs(STOP_POLL_SECS)).await;
            }
        }
    }

    /// One full discovery + verification + persistence pass.
    ///
    /// Never fails: configuration errors are logged and the caller proceeds
    /// to sleep-and-retry; per-URL errors are isolated so one bad link never
    /// aborts the batch.
    pub async fn run_cycle(&self) {
        let _ = self.events.publish(MonitorEvent::cycle_started());
        self.log(LogLevel::Info, "Starting link discovery").await;

        let client = match build_client(self.config.check_timeout()) {
            Ok(client) => client,
            Err(e) => {
                self.log(
                    LogLevel::Error,
                    &format!("{}", MonitorError::Config(e.to_string())),
                )
                .await;
                return;
            }
        };

        let discovered = discover(&self.config, &self.store).await;
        self.log(
            LogLevel::Info,
            &format!("Found {} links", discovered.urls.len()),
        )
        .await;
        let _ = self.events.publish(MonitorEvent::links_discovered(
            discovered.urls.len(),
            discovered.pages_visited,
        ));

        let mut checked = 0usize;
        for url in &discovered.urls {
            match self.check_one(&client, url).await {
                Ok(check) => {
                    checked += 1;
                    let _ = self.events.publish(MonitorEvent::link_checked(&check));
                }
                Err(e) => {
                    error!(url = %url, error = %e, "link check failed");
                    self.log(LogLevel::Error, &format!("Error checking link {url}: {e}"))
                        .await;
                }
            }
        }

        self.log(LogLevel::Info, "Monitoring pass complete").await;
        let _ = self.events.publish(MonitorEvent::cycle_completed(checked));
    }

    /// Resolve the link identity, verify, and persist one result.
    async fn check_one(&self, client: &Client, url: &str) -> Result<LinkCheck, MonitorError> {
        let link_id = self
            .store
            .get_or_create_link(url)
            .await
            .map_err(|e| MonitorError::Persistence(format!("{e:#}")))?;

        let check = verify(client, url, self.config.expected_domain()).await;

        self.store
            .record_check(link_id, &check)
            .await
            .map_err(|e| MonitorError::Persistence(format!("{e:#}")))?;

        Ok(check)
    }

    async fn log(&self, level: LogLevel, message: &str) {
        if let Err(e) = self.store.add_log(level, message).await {
            error!(error = %e, message, "failed to write system log");
        }
    }

    #[must_use]
    pub fn store(&self) -> &LinkStore {
        &self.store
    }

    #[must_use]
    pub fn events(&self) -> &Arc<MonitorEventBus> {
        &self.events
    }
}
