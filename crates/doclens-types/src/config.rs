//! Client configuration types for DocLens.
//!
//! `ClientConfig` represents the `config.toml` that points the client at the
//! REST service and tunes the reveal cadence and request timeout.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the DocLens client.
///
/// Loaded from `~/.config/doclens/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST service hosting `/api/me`, `/api/chats/...`, etc.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Milliseconds between two reveal ticks of the stream renderer.
    #[serde(default = "default_reveal_tick_ms")]
    pub reveal_tick_ms: u64,

    /// Per-request timeout for the REST client, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_reveal_tick_ms() -> u64 {
    20
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            reveal_tick_ms: default_reveal_tick_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
