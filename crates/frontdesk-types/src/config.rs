//! Service configuration shapes.
//!
//! Loaded from `{data_dir}/config.toml` by `frontdesk-infra::config`; every
//! section and field is optional in the file and falls back to these defaults.

use serde::Deserialize;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub notifications: NotificationConfig,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8420,
        }
    }
}

/// Database location. `path` overrides the default `{data_dir}/frontdesk.db`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

/// Notification delivery settings. A missing `webhook_url` means dispatch
/// degrades to a logged no-op.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub webhook_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8420);
        assert!(config.database.path.is_none());
        assert!(config.notifications.webhook_url.is_none());
    }
}
