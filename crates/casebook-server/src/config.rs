//! Server configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use casebook_settings::CasebookSettings;

/// Configuration for the casebook server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (`0` auto-assigns).
    pub port: u16,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight requests to drain on shutdown.
    pub shutdown_timeout_secs: u64,
    /// Recompute case progress when a workflow step is deleted.
    pub recompute_progress_on_delete: bool,
    /// Entries returned by the activity feed.
    pub activity_feed_limit: u32,
}

impl ServerConfig {
    /// Derive server configuration from loaded settings.
    pub fn from_settings(settings: &CasebookSettings) -> Self {
        Self {
            host: settings.server.host.clone(),
            port: settings.server.port,
            request_timeout_secs: settings.server.request_timeout_secs,
            shutdown_timeout_secs: settings.server.shutdown_timeout_secs,
            recompute_progress_on_delete: settings.workflow.recompute_progress_on_delete,
            activity_feed_limit: settings.workflow.activity_feed_limit,
        }
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Shutdown drain timeout.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_settings(&CasebookSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_settings() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
        assert!(!cfg.recompute_progress_on_delete);
        assert_eq!(cfg.activity_feed_limit, 20);
    }

    #[test]
    fn from_custom_settings() {
        let mut settings = CasebookSettings::default();
        settings.server.port = 8080;
        settings.workflow.recompute_progress_on_delete = true;
        settings.workflow.activity_feed_limit = 5;
        let cfg = ServerConfig::from_settings(&settings);
        assert_eq!(cfg.port, 8080);
        assert!(cfg.recompute_progress_on_delete);
        assert_eq!(cfg.activity_feed_limit, 5);
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = ServerConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ServerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.host, cfg.host);
        assert_eq!(back.shutdown_timeout_secs, cfg.shutdown_timeout_secs);
    }
}
