//! HttpIdentityService -- concrete [`IdentityService`] over the REST API.
//!
//! - `GET  /api/me`      -> `{ "user": User }`, failure status = no session
//! - `POST /api/signin`  -> `{ "user": User }`, sets the session cookie
//! - `POST /api/signup`  -> `{ "user": User }`, sets the session cookie
//! - `POST /api/signout` -> 2xx, clears the session cookie
//!
//! Passwords are exposed only while serializing the request body.

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::debug;

use doclens_core::session::identity::IdentityService;
use doclens_types::auth::{Credentials, SignUpRequest};
use doclens_types::error::{AuthError, SessionResolutionError};
use doclens_types::user::{User, UserEnvelope};

use super::ApiClient;

#[derive(Serialize)]
struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Identity service backed by the DocLens REST API.
#[derive(Debug, Clone)]
pub struct HttpIdentityService {
    api: ApiClient,
}

impl HttpIdentityService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// POST `body` to `/api/{action}` and decode the returned user.
    async fn post_for_user<B: Serialize + Sync>(
        &self,
        action: &str,
        body: &B,
        email: &str,
    ) -> Result<User, AuthError> {
        let response = self
            .api
            .http()
            .post(self.api.endpoint(&["api", action]))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AuthError::InvalidCredentials);
            }
            StatusCode::CONFLICT => return Err(AuthError::Conflict(email.to_string())),
            status => return Err(AuthError::Rejected(status.as_u16())),
        }

        let envelope: UserEnvelope = response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        Ok(envelope.user)
    }
}

impl IdentityService for HttpIdentityService {
    async fn current_user(&self) -> Result<User, SessionResolutionError> {
        let response = self
            .api
            .http()
            .get(self.api.endpoint(&["api", "me"]))
            .send()
            .await
            .map_err(|e| SessionResolutionError::Failed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "identity check rejected");
            return Err(SessionResolutionError::Failed(format!("status {}", status.as_u16())));
        }

        let envelope: UserEnvelope = response
            .json()
            .await
            .map_err(|e| SessionResolutionError::Failed(format!("malformed payload: {e}")))?;
        Ok(envelope.user)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let body = SignInBody {
            email: &credentials.email,
            password: credentials.password.expose_secret(),
        };
        self.post_for_user("signin", &body, &credentials.email).await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<User, AuthError> {
        let body = SignUpBody {
            username: &request.username,
            email: &request.email,
            password: request.password.expose_secret(),
        };
        self.post_for_user("signup", &body, &request.email).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let response = self
            .api
            .http()
            .post(self.api.endpoint(&["api", "signout"]))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AuthError::Rejected(status.as_u16()))
        }
    }
}
