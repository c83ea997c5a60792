//! SQLite persistence for monitored links, check results, and system logs.
//!
//! Three append-oriented tables:
//! - `monitored_links` — one row per discovered URL, unique on the URL,
//!   created on first observation and never mutated.
//! - `check_results` — one row per verification attempt (1:N per link),
//!   append-only, per-link chronological by insertion.
//! - `system_logs` — leveled audit trail of pipeline lifecycle events.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};

use crate::verify::{CheckStatus, LinkCheck};

/// SQL schema for the monitoring database
const SCHEMA_SQL: &str = r#"
-- Links under monitoring: identity is the absolute URL
CREATE TABLE IF NOT EXISTS monitored_links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    created_at INTEGER NOT NULL
);

-- One row per verification attempt, append-only
CREATE TABLE IF NOT EXISTS check_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    link_id INTEGER NOT NULL REFERENCES monitored_links(id),
    status TEXT NOT NULL,
    layout_ok INTEGER NOT NULL,
    pattern_ok INTEGER NOT NULL,
    response_time REAL,
    checked_at INTEGER NOT NULL
);

-- Index for per-link history and latest-per-link queries
CREATE INDEX IF NOT EXISTS idx_check_results_link ON check_results(link_id);

-- Index for windowed stats queries
CREATE INDEX IF NOT EXISTS idx_check_results_checked_at ON check_results(checked_at);

-- Pipeline lifecycle audit trail
CREATE TABLE IF NOT EXISTS system_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    level TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
"#;

/// Severity of a system log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INFO" => Ok(Self::Info),
            "ERROR" => Ok(Self::Error),
            other => Err(anyhow!("Unrecognized log level '{other}'")),
        }
    }
}

/// One check result joined with its link's URL, as served to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckRow {
    pub url: String,
    pub status: CheckStatus,
    pub layout_ok: bool,
    pub pattern_ok: bool,
    pub response_time: Option<f64>,
    pub checked_at: DateTime<Utc>,
}

/// Aggregate dashboard state.
///
/// `status_counts` is keyed by the status tag (`"200"`, `"404"`, `"error"`)
/// and computed over each link's latest check only. The `error` sentinel is
/// counted as its own bucket, never folded into a numeric one.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub total_links: i64,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub status_counts: BTreeMap<String, i64>,
}

/// Per-link aggregates over a trailing time window.
#[derive(Debug, Clone)]
pub struct LinkStats {
    pub url: String,
    pub total_checks: i64,
    pub success_checks: i64,
    pub avg_response_time: Option<f64>,
    pub first_check: Option<DateTime<Utc>>,
    pub last_check: Option<DateTime<Utc>>,
}

impl LinkStats {
    /// Share of in-window checks that returned HTTP 200. A link with no
    /// checks in the window reports 100.0, matching "no observed downtime".
    #[must_use]
    pub fn uptime_percent(&self) -> f64 {
        if self.total_checks == 0 {
            return 100.0;
        }
        (self.success_checks as f64 / self.total_checks as f64) * 100.0
    }
}

/// One system log entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Persistent store for monitoring results.
///
/// Uses SQLite with WAL mode so the dashboard can read while the cycle
/// writes. Writes are small, append-only, and wrapped in short transactions.
#[derive(Clone)]
pub struct LinkStore {
    pool: SqlitePool,
}

impl LinkStore {
    /// Open an existing database or create a new one at `path`.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .context("Failed to open SQLite database")?;

        sqlx::query(SCHEMA_SQL)
            .execute(&pool)
            .await
            .context("Failed to initialize database schema")?;

        Ok(Self { pool })
    }

    /// Resolve a URL to its link id, creating the row on first observation.
    ///
    /// Idempotent: re-discovering the same URL across cycles returns the
    /// same id, never a duplicate.
    pub async fn get_or_create_link(&self, url: &str) -> Result<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("INSERT INTO monitored_links (url, created_at) VALUES (?, ?) ON CONFLICT(url) DO NOTHING")
            .bind(url)
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await
            .context("Failed to insert monitored link")?;

        let (id,): (i64,) = sqlx::query_as("SELECT id FROM monitored_links WHERE url = ?")
            .bind(url)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to resolve link id")?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(id)
    }

    /// Append one verification result for a link. Prior rows are never
    /// edited; `link_id` must reference an existing link.
    ///
    /// Latency is stored as NULL for transport failures — the elapsed time
    /// of a failed attempt measures the failure, not the link.
    pub async fn record_check(&self, link_id: i64, check: &LinkCheck) -> Result<i64> {
        let response_time = match check.status {
            CheckStatus::Error => None,
            CheckStatus::Http(_) => Some(check.elapsed_seconds),
        };

        let result = sqlx::query(
            r#"
            INSERT INTO check_results (link_id, status, layout_ok, pattern_ok, response_time, checked_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(link_id)
        .bind(check.status.to_string())
        .bind(check.layout_ok)
        .bind(check.pattern_ok)
        .bind(response_time)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .context("Failed to insert check result")?;

        Ok(result.last_insert_rowid())
    }

    /// The most recent check results across all links, newest first.
    pub async fn latest_checks(&self, limit: usize) -> Result<Vec<CheckRow>> {
        let rows = sqlx::query(
            r#"
            SELECT ml.url, cr.status, cr.layout_ok, cr.pattern_ok, cr.response_time, cr.checked_at
            FROM check_results cr
            JOIN monitored_links ml ON cr.link_id = ml.id
            ORDER BY cr.checked_at DESC, cr.id DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to query latest checks")?;

        rows.into_iter()
            .map(|row| {
                let status: String = row.get("status");
                Ok(CheckRow {
                    url: row.get("url"),
                    status: status.parse()?,
                    layout_ok: row.get("layout_ok"),
                    pattern_ok: row.get("pattern_ok"),
                    response_time: row.get("response_time"),
                    checked_at: timestamp(row.get("checked_at"))?,
                })
            })
            .collect()
    }

    /// Aggregate dashboard state: link total, last check time, and the
    /// status distribution over each link's latest check only.
    ///
    /// "Latest" is the row with the greatest id per link; inserts are
    /// append-only and per-link chronological, so id order equals timestamp
    /// order with insertion-order tie-breaking.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let (total_links,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM monitored_links")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count monitored links")?;

        let (last,): (Option<i64>,) = sqlx::query_as("SELECT MAX(checked_at) FROM check_results")
            .fetch_one(&self.pool)
            .await
            .context("Failed to query last check time")?;
        let last_checked_at = last.map(timestamp).transpose()?;

        let counts: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT cr.status, COUNT(*)
            FROM check_results cr
            JOIN (
                SELECT link_id, MAX(id) AS latest_id
                FROM check_results
                GROUP BY link_id
            ) latest ON cr.id = latest.latest_id
            GROUP BY cr.status
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to aggregate status counts")?;

        Ok(DashboardSummary {
            total_links,
            last_checked_at,
            status_counts: counts.into_iter().collect(),
        })
    }

    /// Per-link aggregates over the trailing `hours` window. Links with no
    /// checks in the window appear with zero totals.
    pub async fn link_stats(&self, hours: i64) -> Result<Vec<LinkStats>> {
        let cutoff = Utc::now().timestamp() - hours * 3600;

        let rows: Vec<(String, i64, i64, Option<f64>, Option<i64>, Option<i64>)> =
            sqlx::query_as(
                r#"
                SELECT
                    ml.url,
                    COUNT(cr.id),
                    COALESCE(SUM(CASE WHEN cr.status = '200' THEN 1 ELSE 0 END), 0),
                    AVG(cr.response_time),
                    MIN(cr.checked_at),
                    MAX(cr.checked_at)
                FROM monitored_links ml
                LEFT JOIN check_results cr
                    ON ml.id = cr.link_id AND cr.checked_at >= ?
                GROUP BY ml.id
                ORDER BY ml.url
                "#,
            )
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await
            .context("Failed to query link stats")?;

        rows.into_iter()
            .map(|(url, total, success, avg_rt, first, last)| {
                Ok(LinkStats {
                    url,
                    total_checks: total,
                    success_checks: success,
                    avg_response_time: avg_rt,
                    first_check: first.map(timestamp).transpose()?,
                    last_check: last.map(timestamp).transpose()?,
                })
            })
            .collect()
    }

    /// Append a system log entry.
    pub async fn add_log(&self, level: LogLevel, message: &str) -> Result<()> {
        sqlx::query("INSERT INTO system_logs (level, message, created_at) VALUES (?, ?, ?)")
            .bind(level.to_string())
            .bind(message)
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .context("Failed to insert system log")?;
        Ok(())
    }

    /// Most recent system log entries, newest first.
    pub async fn recent_logs(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.query_logs("ORDER BY id DESC", limit).await
    }

    /// System log entries from the beginning, oldest first.
    pub async fn logs_oldest_first(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.query_logs("ORDER BY id ASC", limit).await
    }

    async fn query_logs(&self, order: &str, limit: usize) -> Result<Vec<LogEntry>> {
        let sql = format!("SELECT level, message, created_at FROM system_logs {order} LIMIT ?");
        let rows: Vec<(String, String, i64)> = sqlx::query_as(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .context("Failed to query system logs")?;

        rows.into_iter()
            .map(|(level, message, created_at)| {
                Ok(LogEntry {
                    level: level.parse()?,
                    message,
                    created_at: timestamp(created_at)?,
                })
            })
            .collect()
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| anyhow!("Timestamp out of range: {secs}"))
}
