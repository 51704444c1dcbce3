//! Client session state.
//!
//! A session is tri-valued: unresolved until the boot-time identity check
//! settles, then either absent or present. Once settled it never returns to
//! unresolved; only explicit sign-in and sign-out move it between the two
//! settled states.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::error::SessionTransitionError;
use crate::user::User;

/// Resolved authentication status of the current client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "user", rename_all = "lowercase")]
pub enum SessionState {
    /// Boot-time state, before the identity check completes.
    #[default]
    Unresolved,
    /// No valid session.
    Absent,
    /// A valid session for the given user.
    Present(User),
}

impl SessionState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, SessionState::Unresolved)
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Present(user) => Some(user),
            _ => None,
        }
    }

    /// Validate a move to `next` against the session state machine.
    ///
    /// ```text
    /// unresolved -> present | absent     (boot-time check)
    /// present    -> absent               (sign-out)
    /// absent     -> present              (sign-in)
    /// present    -> present              (sign-in as another user, wholesale replace)
    /// ```
    pub fn check_transition(&self, next: &SessionState) -> Result<(), SessionTransitionError> {
        match (self, next) {
            (_, SessionState::Unresolved) => Err(SessionTransitionError::BackToUnresolved),
            (SessionState::Unresolved, _) => Ok(()),
            (SessionState::Absent, SessionState::Present(_)) => Ok(()),
            (SessionState::Present(_), SessionState::Absent) => Ok(()),
            (SessionState::Present(_), SessionState::Present(_)) => Ok(()),
            (SessionState::Absent, SessionState::Absent) => Ok(()),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Unresolved => write!(f, "unresolved"),
            SessionState::Absent => write!(f, "absent"),
            SessionState::Present(user) => write!(f, "present({})", user.username),
        }
    }
}
