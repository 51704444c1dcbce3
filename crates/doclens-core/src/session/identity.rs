//! IdentityService trait definition.
//!
//! The identity service is an external collaborator: it answers "who am I"
//! and performs the sign-in, sign-up and sign-out mutations. Implementations
//! live in doclens-infra (e.g., `HttpIdentityService`).

use doclens_types::auth::{Credentials, SignUpRequest};
use doclens_types::error::{AuthError, SessionResolutionError};
use doclens_types::user::User;

/// Port for the identity service.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait IdentityService: Send + Sync {
    /// Fetch the user behind the current session (`GET /api/me`).
    ///
    /// The absence of a session is reported as an error, not as a successful
    /// "no user" payload.
    fn current_user(
        &self,
    ) -> impl std::future::Future<Output = Result<User, SessionResolutionError>> + Send;

    /// Authenticate with email and password.
    fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<User, AuthError>> + Send;

    /// Create an account and start a session for it.
    fn sign_up(
        &self,
        request: &SignUpRequest,
    ) -> impl std::future::Future<Output = Result<User, AuthError>> + Send;

    /// End the current session.
    fn sign_out(&self) -> impl std::future::Future<Output = Result<(), AuthError>> + Send;
}
