//! Application state wiring all services together.
//!
//! The core types are generic over their ports; AppState pins them to the
//! REST adapters from doclens-infra.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use doclens_core::session::gate::SessionGate;
use doclens_infra::config::{load_client_config, resolve_config_dir, resolve_reveal_tick};
use doclens_infra::http::ApiClient;
use doclens_infra::http::chat::HttpChatHistoryService;
use doclens_infra::http::identity::HttpIdentityService;
use doclens_infra::session_file::{
    clear_session_cookie, load_session_cookie, save_session_cookie,
};
use doclens_types::config::ClientConfig;

pub type ConcreteSessionGate = SessionGate<HttpIdentityService>;

/// Shared application state holding all services.
pub struct AppState {
    pub gate: Arc<ConcreteSessionGate>,
    pub chats: HttpChatHistoryService,
    pub api: ApiClient,
    pub config: ClientConfig,
    pub config_dir: PathBuf,
    pub reveal_tick: Duration,
}

impl AppState {
    /// Load config, restore the saved session cookie and wire the services.
    pub async fn init(api_url: Option<String>, tick_ms: Option<u64>) -> anyhow::Result<Self> {
        let config_dir = resolve_config_dir();
        let mut config = load_client_config(&config_dir).await;
        if let Some(url) = api_url {
            config.api_base_url = url;
        }
        let reveal_tick = resolve_reveal_tick(&config, tick_ms);
        Self::with_config(config, config_dir, reveal_tick).await
    }

    /// Wire the services for an already resolved config.
    pub async fn with_config(
        config: ClientConfig,
        config_dir: PathBuf,
        reveal_tick: Duration,
    ) -> anyhow::Result<Self> {
        let api = ApiClient::new(&config)?;
        if let Some(cookie) = load_session_cookie(&config_dir).await {
            api.restore_session_cookie(&cookie);
            tracing::debug!("restored saved session cookie");
        }

        let gate = SessionGate::new(HttpIdentityService::new(api.clone()));
        let chats = HttpChatHistoryService::new(api.clone());

        Ok(Self {
            gate: Arc::new(gate),
            chats,
            api,
            config,
            config_dir,
            reveal_tick,
        })
    }

    /// Save the cookie the service set, so the next invocation is signed in.
    pub async fn persist_session(&self) -> anyhow::Result<()> {
        match self.api.session_cookie() {
            Some(cookie) => save_session_cookie(&self.config_dir, &cookie).await,
            None => {
                tracing::warn!("service set no session cookie; sign-in will not persist");
                Ok(())
            }
        }
    }

    /// Forget the saved session cookie.
    pub async fn forget_session(&self) -> anyhow::Result<()> {
        clear_session_cookie(&self.config_dir).await
    }
}
