//! Probing a running server's health endpoint.

use serde::Serialize;
use std::time::Duration;

use crate::error::{DepotError, Result};

/// Default time to wait for the server to answer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// What `GET /health` returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub url: String,
    pub status: u16,
    pub body: String,
    pub healthy: bool,
}

/// URL of the health endpoint for a bind address.
///
/// A wildcard bind host is not routable, so it is probed via loopback.
/// IPv6 literals are bracketed.
pub fn health_url(host: &str, port: u16) -> String {
    let host = match host.trim_start_matches('[').trim_end_matches(']') {
        "0.0.0.0" | "" => "127.0.0.1".to_string(),
        "::" => "[::1]".to_string(),
        v6 if v6.contains(':') => format!("[{}]", v6),
        other => other.to_string(),
    };
    format!("http://{}:{}/health", host, port)
}

/// Issue the request. Only connection-level failures are errors; a non-2xx
/// answer is reported as unhealthy.
pub fn probe(url: &str, timeout: Duration) -> Result<HealthReport> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("depot/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(anyhow::Error::from)?;

    tracing::debug!("GET {}", url);
    let response = client.get(url).send().map_err(|e| {
        DepotError::Other(anyhow::anyhow!("Server not reachable at {}: {}", url, e))
    })?;

    let status = response.status();
    let body = response.text().unwrap_or_default();

    Ok(HealthReport {
        url: url.to_string(),
        status: status.as_u16(),
        body: body.trim().to_string(),
        healthy: status.is_success(),
    })
}
