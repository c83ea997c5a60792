//! Link verification: a timed HTTP GET per URL, status classification, and
//! two independent flags — coarse structural presence and domain conformance.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::constants::BROWSER_USER_AGENT;
use crate::utils::host_matches_domain;

lazy_static! {
    // Tag-presence probes over the raw body. A DOM parse is useless for this
    // check: html5ever-family parsers synthesize <head>/<body> nodes for any
    // input, which would make the flag vacuously true.
    static ref HEAD_TAG: Regex = Regex::new(r"(?i)<head[\s/>]").expect("static pattern");
    static ref BODY_TAG: Regex = Regex::new(r"(?i)<body[\s/>]").expect("static pattern");
}

/// Outcome classification of one verification attempt.
///
/// `Error` is a distinct sentinel, never conflated with any numeric HTTP
/// status, so downstream aggregation can separate "never reachable" from
/// "reachable but non-200".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CheckStatus {
    /// Transport succeeded; the numeric HTTP status code.
    Http(u16),
    /// Transport failure: timeout, connection refused, DNS, TLS.
    Error,
}

impl CheckStatus {
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Http(200))
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(code) => write!(f, "{code}"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl FromStr for CheckStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("error") {
            return Ok(Self::Error);
        }
        let code: u16 = s
            .parse()
            .map_err(|_| anyhow::anyhow!("Unrecognized check status '{s}'"))?;
        Ok(Self::Http(code))
    }
}

impl From<CheckStatus> for String {
    fn from(status: CheckStatus) -> Self {
        status.to_string()
    }
}

impl TryFrom<String> for CheckStatus {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, anyhow::Error> {
        s.parse()
    }
}

/// Result of one verification attempt against one URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkCheck {
    pub url: String,
    pub status: CheckStatus,
    /// Status was 200 and the body carried minimal head/body structure.
    pub layout_ok: bool,
    /// URL host equals or is a subdomain of the expected domain.
    pub pattern_ok: bool,
    /// Wall time spent on the attempt, including time before a failure.
    pub elapsed_seconds: f64,
}

/// Build the shared verification client with a bounded per-request timeout.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Verify a single URL.
///
/// Never returns an error: transport failures classify as
/// `CheckStatus::Error`, malformed HTML classifies as `layout_ok = false`.
pub async fn verify(client: &Client, url: &str, expected_domain: &str) -> LinkCheck {
    let started = Instant::now();

    match fetch(client, url).await {
        Ok((code, body)) => LinkCheck {
            url: url.to_string(),
            status: CheckStatus::Http(code),
            layout_ok: code == 200 && has_minimal_layout(&body),
            pattern_ok: host_matches_domain(url, expected_domain),
            elapsed_seconds: started.elapsed().as_secs_f64(),
        },
        Err(err) => {
            debug!(url, error = %err, "transport failure during verification");
            LinkCheck {
                url: url.to_string(),
                status: CheckStatus::Error,
                layout_ok: false,
                pattern_ok: false,
                elapsed_seconds: started.elapsed().as_secs_f64(),
            }
        }
    }
}

async fn fetch(client: &Client, url: &str) -> reqwest::Result<(u16, String)> {
    let response = client.get(url).send().await?;
    let code = response.status().as_u16();
    let body = response.text().await?;
    Ok((code, body))
}

/// True if the body contains both a head-equivalent and a body-equivalent
/// structural element. Coarse by design; not HTML validation.
#[must_use]
pub fn has_minimal_layout(body: &str) -> bool {
    HEAD_TAG.is_match(body) && BODY_TAG.is_match(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_probe_requires_both_elements() {
        assert!(has_minimal_layout(
            "<html><head><title>x</title></head><body>hi</body></html>"
        ));
        assert!(has_minimal_layout("<HTML><HEAD></HEAD><BODY class=\"a\">"));
        assert!(!has_minimal_layout("<html><body>no head</body></html>"));
        assert!(!has_minimal_layout("<head></head> only"));
        assert!(!has_minimal_layout("plain text"));
        // <header> must not count as <head>
        assert!(!has_minimal_layout("<header></header><body></body>"));
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("200".parse::<CheckStatus>().unwrap(), CheckStatus::Http(200));
        assert_eq!("error".parse::<CheckStatus>().unwrap(), CheckStatus::Error);
        assert_eq!(CheckStatus::Http(404).to_string(), "404");
        assert_eq!(CheckStatus::Error.to_string(), "error");
        assert!("not-a-status".parse::<CheckStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_distinct_tags() {
        let ok = serde_json::to_string(&CheckStatus::Http(200)).unwrap();
        let err = serde_json::to_string(&CheckStatus::Error).unwrap();
        assert_eq!(ok, "\"200\"");
        assert_eq!(err, "\"error\"");
        assert_ne!(ok, err);
    }
}
