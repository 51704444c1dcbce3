//! Route classification types.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Landing page for signed-in users.
pub const HOME_PATH: &str = "/";
/// Sign-in page; where unauthenticated visitors are sent.
pub const SIGNIN_PATH: &str = "/signin";
/// Account creation page.
pub const SIGNUP_PATH: &str = "/signup";

/// Paths reachable without a session. Membership is exact, no prefixes.
pub const PUBLIC_PATHS: &[&str] = &[SIGNIN_PATH, SIGNUP_PATH];

/// Static categorization of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteClass {
    /// Only reachable without a session.
    Public,
    /// Requires a session.
    Protected,
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteClass::Public => write!(f, "public"),
            RouteClass::Protected => write!(f, "protected"),
        }
    }
}

/// Outcome of evaluating the route rule for a session state and route class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session not yet known: show the full-page loading indicator.
    Loading,
    /// Navigate to the given path; keep showing the loading indicator until
    /// the navigation is observed.
    Redirect(&'static str),
    /// Render the page, wrapped in the authenticated chrome when `chrome`.
    Render { chrome: bool },
}
