//! Settings types.
//!
//! Every struct uses `#[serde(default)]` so a partial settings file only has
//! to name the keys it overrides.

use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CasebookSettings {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// `SQLite` database settings.
    pub database: DatabaseSettings,
    /// Log output settings.
    pub logging: LoggingSettings,
    /// Workflow behaviour switches.
    pub workflow: WorkflowSettings,
}

/// HTTP server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port (`0` auto-assigns).
    pub port: u16,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight requests to drain on shutdown.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
        }
    }
}

/// `SQLite` database settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Database file. Relative paths resolve against `~/.casebook`.
    pub path: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// `SQLite` busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "casebook.db".to_string(),
            pool_size: 8,
            busy_timeout_ms: 5_000,
        }
    }
}

/// Log output settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of the compact format.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Workflow behaviour switches.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowSettings {
    /// Recompute case progress after a workflow step is deleted.
    pub recompute_progress_on_delete: bool,
    /// Number of rows returned by the activity feed.
    pub activity_feed_limit: u32,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            recompute_progress_on_delete: false,
            activity_feed_limit: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(CasebookSettings::default()).unwrap();
        assert_eq!(json["server"]["requestTimeoutSecs"], 30);
        assert_eq!(json["database"]["busyTimeoutMs"], 5_000);
        assert_eq!(json["workflow"]["recomputeProgressOnDelete"], false);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: CasebookSettings =
            serde_json::from_str(r#"{"server":{"port":8080}}"#).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.database.path, "casebook.db");
    }
}
