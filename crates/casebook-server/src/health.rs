//! `/health` endpoint.

use serde::Serialize;
use std::time::Instant;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `"ok"` when the database answered, `"degraded"` otherwise.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Crate version.
    pub version: String,
    /// Current time (ISO 8601, UTC).
    pub timestamp: String,
}

/// Build a health response.
pub fn health_check(start_time: Instant, database_ok: bool) -> HealthResponse {
    HealthResponse {
        status: if database_ok { "ok" } else { "degraded" }.into(),
        uptime_secs: start_time.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").into(),
        timestamp: casebook_core::now_iso(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_ok() {
        let resp = health_check(Instant::now(), true);
        assert_eq!(resp.status, "ok");
    }

    #[test]
    fn degraded_when_database_down() {
        let resp = health_check(Instant::now(), false);
        assert_eq!(resp.status, "degraded");
    }

    #[test]
    fn uptime_increases() {
        let start = Instant::now()
            .checked_sub(std::time::Duration::from_secs(60))
            .unwrap();
        let resp = health_check(start, true);
        assert!(resp.uptime_secs >= 59);
    }

    #[test]
    fn serialization() {
        let resp = health_check(Instant::now(), true);
        let parsed = serde_json::to_value(&resp).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert!(parsed["uptimeSecs"].is_number());
        assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));
        assert!(parsed["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
