//! Sign-in and sign-up request types.
//!
//! Passwords are held as [`SecretString`] so they never show up in `Debug`
//! output or logs. Serialization to the wire happens in the HTTP adapter,
//! which exposes the secret only while building the request body.

use secrecy::SecretString;

/// Email + password credentials for `POST /api/signin`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Account creation request for `POST /api/signup`.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

impl SignUpRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}
