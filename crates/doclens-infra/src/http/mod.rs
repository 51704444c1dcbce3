//! REST adapters for the DocLens service.
//!
//! [`ApiClient`] wraps one `reqwest::Client` with a cookie store, so the
//! session cookie set by sign-in rides along on every later request. The
//! identity and chat history adapters share it.

pub mod chat;
pub mod identity;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use doclens_types::config::ClientConfig;
use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};

/// Shared HTTP client bound to the service base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    cookies: Arc<Jar>,
}

impl ApiClient {
    /// Build a client from the configured base URL and timeout.
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.api_base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.api_base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL cannot carry paths: {}", config.api_base_url);
        }

        let cookies = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .user_agent(concat!("doclens/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(cookies.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            cookies,
        })
    }

    /// The `Cookie` header the client would send to the service, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.cookies
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Seed the cookie store from a saved `Cookie` header (`a=1; b=2`).
    pub fn restore_session_cookie(&self, header: &str) {
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.cookies
                .add_cookie_str(&format!("{pair}; Path=/"), &self.base_url);
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// URL for the given path segments under the base URL.
    ///
    /// Segments are percent-encoded, so ids can never escape their slot.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
