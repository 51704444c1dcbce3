//! Client configuration loader for DocLens.
//!
//! Reads `config.toml` from the config directory (`~/.config/doclens/` in
//! production) and deserializes it into [`ClientConfig`]. Falls back to
//! sensible defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use doclens_types::config::ClientConfig;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "DOCLENS_CONFIG_DIR";

/// Minimum reveal tick (safety floor).
const MIN_REVEAL_TICK_MS: u64 = 1;

/// Resolve the config directory from environment or platform defaults.
///
/// Priority:
/// 1. `DOCLENS_CONFIG_DIR` environment variable
/// 2. Platform config directory (e.g., `~/.config/doclens` on Linux)
/// 3. `.doclens` in the current directory
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(config) = dirs::config_dir() {
        return config.join("doclens");
    }

    PathBuf::from(".doclens")
}

/// Load client configuration from `{config_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_client_config(config_dir: &Path) -> ClientConfig {
    let config_path = config_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Resolve the reveal tick.
///
/// Priority:
/// 1. Command-line override
/// 2. `reveal_tick_ms` from `config.toml`
///
/// A floor of 1ms is enforced regardless of source.
pub fn resolve_reveal_tick(config: &ClientConfig, cli_override: Option<u64>) -> Duration {
    let ms = cli_override.unwrap_or(config.reveal_tick_ms);
    Duration::from_millis(ms.max(MIN_REVEAL_TICK_MS))
}
