//! Service configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.frontdesk/` in
//! production) and deserializes it into [`ServiceConfig`]. Falls back to the
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use frontdesk_types::config::ServiceConfig;

/// Resolve the data directory: `FRONTDESK_DATA_DIR` env var, falling back to
/// `~/.frontdesk`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FRONTDESK_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".frontdesk")
}

/// Load service configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ServiceConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> ServiceConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return ServiceConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return ServiceConfig::default();
        }
    };

    match toml::from_str::<ServiceConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ServiceConfig::default()
        }
    }
}

/// Resolve the database URL: explicit `database.path` from the config wins,
/// otherwise `{data_dir}/frontdesk.db`.
pub fn resolve_database_url(config: &ServiceConfig, data_dir: &Path) -> String {
    match &config.database.path {
        Some(path) => format!("sqlite://{path}"),
        None => format!("sqlite://{}/frontdesk.db", data_dir.display()),
    }
}
