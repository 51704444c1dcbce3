//! Shared session state.
//!
//! The session lives in a `tokio::sync::watch` channel split into two halves:
//! a single [`SessionWriter`] owned by the session gate, and any number of
//! cloneable [`SessionStore`] read handles. Every write is validated against
//! the session state machine before it is published.

use doclens_types::error::SessionTransitionError;
use doclens_types::session::SessionState;
use doclens_types::user::User;
use tokio::sync::watch;

/// Create a fresh session channel in the `Unresolved` state.
pub fn session_channel() -> (SessionWriter, SessionStore) {
    let (sender, receiver) = watch::channel(SessionState::Unresolved);
    (SessionWriter { sender }, SessionStore { receiver })
}

/// Write half of the session channel. Not `Clone`: there is one writer.
#[derive(Debug)]
pub struct SessionWriter {
    sender: watch::Sender<SessionState>,
}

impl SessionWriter {
    /// Move the session to `next`.
    ///
    /// Subscribers are only woken when the value actually changes. An
    /// illegal transition leaves the state untouched.
    pub fn set(&self, next: SessionState) -> Result<(), SessionTransitionError> {
        let mut outcome = Ok(());
        self.sender.send_if_modified(|state| {
            if let Err(e) = state.check_transition(&next) {
                outcome = Err(e);
                return false;
            }
            if *state == next {
                return false;
            }
            *state = next;
            true
        });
        outcome
    }

    /// Settle an `Unresolved` session to `next`.
    ///
    /// Returns `false` without writing if the session already settled (for
    /// example through a sign-in that completed first).
    pub fn settle(&self, next: SessionState) -> bool {
        if !next.is_resolved() {
            return false;
        }
        self.sender.send_if_modified(|state| {
            if state.is_resolved() {
                return false;
            }
            *state = next;
            true
        })
    }

    /// Replace the session with a signed-in user.
    pub fn set_present(&self, user: User) -> Result<(), SessionTransitionError> {
        self.set(SessionState::Present(user))
    }

    /// Clear the session.
    pub fn set_absent(&self) -> Result<(), SessionTransitionError> {
        self.set(SessionState::Absent)
    }
}

/// Read half of the session channel. Cheap to clone and hand to consumers.
#[derive(Debug, Clone)]
pub struct SessionStore {
    receiver: watch::Receiver<SessionState>,
}

impl SessionStore {
    /// Snapshot of the current session state.
    pub fn current(&self) -> SessionState {
        self.receiver.borrow().clone()
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<User> {
        self.receiver.borrow().user().cloned()
    }

    /// A receiver that is notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.receiver.clone()
    }

    /// Wait until the session leaves `Unresolved` and return the settled state.
    ///
    /// If the writer goes away before the session settles, the last observed
    /// state (still `Unresolved`) is returned.
    pub async fn wait_resolved(&self) -> SessionState {
        let mut rx = self.receiver.clone();
        let settled = rx
            .wait_for(SessionState::is_resolved)
            .await
            .map(|state| state.clone());
        settled.unwrap_or_else(|_| rx.borrow().clone())
    }
}
