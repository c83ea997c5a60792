// Monitor daemon: runs the discovery + verification cycle until interrupted.
//
// Usage:
//   linkwatch <config.json>       run the monitor with a JSON config file
//   linkwatch                     run with LINKWATCH_* environment variables
//   linkwatch export [db-path]    print the latest check results as CSV

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::info;
use tracing_subscriber::EnvFilter;

use linkwatch::events::map_recv_error;
use linkwatch::store::LinkStore;
use linkwatch::utils::constants::{DEFAULT_DB_PATH, DEFAULT_LATEST_LIMIT};
use linkwatch::{EventBusError, MonitorConfig, MonitorController, MonitorEventBus, export_csv};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("export") => {
            let db_path = args
                .next()
                .map_or_else(|| PathBuf::from(DEFAULT_DB_PATH), PathBuf::from);
            run_export(&db_path).await
        }
        first => run_monitor(load_config(first)?).await,
    }
}

async fn run_monitor(config: MonitorConfig) -> Result<()> {
    let store = LinkStore::open(config.db_path()).await?;
    let events = Arc::new(MonitorEventBus::default());

    // Mirror pushed events onto the process log so the daemon is observable
    // without a dashboard attached.
    let mut receiver = events.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => info!("[{}] {}", event.level(), event.message()),
                Err(e) => match map_recv_error(e) {
                    EventBusError::ReceiverLagged(_) => continue,
                    _ => break,
                },
            }
        }
    });

    let controller = Arc::new(MonitorController::new(config, store, events));
    controller.start().await;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("shutdown signal received");
    controller.stop().await;

    Ok(())
}

async fn run_export(db_path: &std::path::Path) -> Result<()> {
    let store = LinkStore::open(db_path).await?;
    let rows = store.latest_checks(DEFAULT_LATEST_LIMIT).await?;
    print!("{}", export_csv(&rows));
    store.close().await;
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<MonitorConfig> {
    if let Some(path) = path {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        let config: MonitorConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {path}"))?;
        return Ok(config);
    }

    let listing_url = std::env::var("LINKWATCH_LISTING_URL")
        .map_err(|_| anyhow!("Pass a config file or set LINKWATCH_LISTING_URL"))?;
    let expected_domain = std::env::var("LINKWATCH_EXPECTED_DOMAIN")
        .map_err(|_| anyhow!("LINKWATCH_EXPECTED_DOMAIN is required"))?;

    MonitorConfig::builder()
        .listing_url(listing_url)
        .expected_domain(expected_domain)
        .build()
}
