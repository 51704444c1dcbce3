//! Session gate: one-shot session resolution plus the explicit sign-in,
//! sign-up and sign-out transitions.
//!
//! The gate owns the only [`SessionWriter`]. Consumers get read access through
//! [`SessionGate::store`] and never mutate the session themselves.

use std::sync::atomic::{AtomicBool, Ordering};

use doclens_types::auth::{Credentials, SignUpRequest};
use doclens_types::error::AuthError;
use doclens_types::route::SIGNIN_PATH;
use doclens_types::session::SessionState;
use doclens_types::user::User;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::route::navigator::Navigator;

use super::identity::IdentityService;
use super::store::{SessionStore, SessionWriter, session_channel};

/// Resolves the session once per application load and applies explicit
/// sign-in/sign-out transitions.
///
/// Generic over [`IdentityService`] so doclens-core never depends on the
/// HTTP adapter in doclens-infra.
pub struct SessionGate<I: IdentityService> {
    identity: I,
    writer: SessionWriter,
    store: SessionStore,
    /// Set by the first `resolve_session` call; later calls never hit the network.
    check_issued: AtomicBool,
    /// True until the first resolution settles, whatever its outcome.
    loading: AtomicBool,
    /// Cancelled on teardown; an in-flight check result is then discarded.
    torn_down: CancellationToken,
}

impl<I: IdentityService> SessionGate<I> {
    pub fn new(identity: I) -> Self {
        let (writer, store) = session_channel();
        Self {
            identity,
            writer,
            store,
            check_issued: AtomicBool::new(false),
            loading: AtomicBool::new(true),
            torn_down: CancellationToken::new(),
        }
    }

    /// A read handle on the session.
    pub fn store(&self) -> SessionStore {
        self.store.clone()
    }

    /// Whether the initial session check is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Run the one-shot "who am I" check and settle the session.
    ///
    /// Any failure settles the session to `Absent`; it is never retried.
    /// Calling this again returns the settled state without a second request.
    /// If the first call is dropped before the identity service answers, the
    /// session settles to `Absent` as if the check had failed.
    pub async fn resolve_session(&self) -> SessionState {
        if self.check_issued.swap(true, Ordering::AcqRel) {
            debug!("session check already issued, waiting for its outcome");
            return tokio::select! {
                state = self.store.wait_resolved() => state,
                _ = self.torn_down.cancelled() => self.store.current(),
            };
        }

        let guard = AbandonedCheck {
            gate: self,
            armed: true,
        };
        let outcome = self.identity.current_user().await;
        guard.disarm();

        if self.torn_down.is_cancelled() {
            debug!("session gate torn down during session check, discarding result");
            return self.store.current();
        }

        let next = match outcome {
            Ok(user) => {
                info!(user = %user.username, "session resolved");
                SessionState::Present(user)
            }
            Err(e) => {
                debug!(error = %e, "no session");
                SessionState::Absent
            }
        };

        if !self.writer.settle(next) {
            debug!("session settled elsewhere before the check returned");
        }
        self.loading.store(false, Ordering::Release);
        self.store.current()
    }

    /// Sign in and replace the session with the returned user.
    ///
    /// On failure the session is left untouched.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let user = self.identity.sign_in(credentials).await?;
        self.replace_user(user.clone());
        Ok(user)
    }

    /// Create an account; on success the new user is signed in.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<User, AuthError> {
        let user = self.identity.sign_up(request).await?;
        self.replace_user(user.clone());
        Ok(user)
    }

    /// Sign out, clear the session and send the navigator to the sign-in page.
    pub async fn sign_out<N: Navigator>(&self, navigator: &N) -> Result<(), AuthError> {
        self.identity.sign_out().await?;
        if let Err(e) = self.writer.set_absent() {
            warn!(error = %e, "could not clear session after sign-out");
        }
        info!("signed out");
        navigator.navigate(SIGNIN_PATH);
        Ok(())
    }

    /// Tear the gate down. A session check still in flight is discarded.
    pub fn shutdown(&self) {
        self.torn_down.cancel();
    }

    fn replace_user(&self, user: User) {
        info!(user = %user.username, "signed in");
        if let Err(e) = self.writer.set_present(user) {
            warn!(error = %e, "could not store signed-in user");
        }
    }
}

/// Settles the session to `Absent` if the check future is dropped before the
/// identity service answers, so later callers never wait on a check that
/// will not finish. A torn-down gate is left as is.
struct AbandonedCheck<'a, I: IdentityService> {
    gate: &'a SessionGate<I>,
    armed: bool,
}

impl<I: IdentityService> AbandonedCheck<'_, I> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<I: IdentityService> Drop for AbandonedCheck<'_, I> {
    fn drop(&mut self) {
        if !self.armed || self.gate.torn_down.is_cancelled() {
            return;
        }
        debug!("session check abandoned before completion, settling as no session");
        self.gate.writer.settle(SessionState::Absent);
        self.gate.loading.store(false, Ordering::Release);
    }
}

impl<I: IdentityService> Drop for SessionGate<I> {
    fn drop(&mut self) {
        self.torn_down.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::route::navigator::History;
    use chrono::Utc;
    use doclens_types::error::SessionResolutionError;
    use doclens_types::user::UserId;
    use secrecy::ExposeSecret;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn user(name: &str) -> User {
        User {
            id: UserId::new(format!("id-{name}")),
            username: name.to_string(),
            email: format!("{name}@example.com"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Identity service double with call counting and an optional hold on `/api/me`.
    #[derive(Default)]
    struct FakeIdentity {
        me: Option<User>,
        me_calls: AtomicUsize,
        hold: Option<Arc<Notify>>,
        sign_out_fails: bool,
    }

    impl IdentityService for FakeIdentity {
        async fn current_user(&self) -> Result<User, SessionResolutionError> {
            self.me_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            self.me
                .clone()
                .ok_or_else(|| SessionResolutionError::Failed("status 401".to_string()))
        }

        async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
            if credentials.password.expose_secret() == "correct" {
                Ok(user("grace"))
            } else {
                Err(AuthError::InvalidCredentials)
            }
        }

        async fn sign_up(&self, request: &SignUpRequest) -> Result<User, AuthError> {
            Ok(user(&request.username))
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            if self.sign_out_fails {
                Err(AuthError::Rejected(500))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn successful_check_settles_present() {
        let gate = SessionGate::new(FakeIdentity {
            me: Some(user("ada")),
            ..Default::default()
        });
        assert!(gate.is_loading());

        let state = gate.resolve_session().await;
        assert_eq!(state.user().unwrap().username, "ada");
        assert!(!gate.is_loading());
        assert_eq!(gate.store().current(), state);
    }

    #[tokio::test]
    async fn failed_check_settles_absent() {
        let gate = SessionGate::new(FakeIdentity::default());
        assert_eq!(gate.resolve_session().await, SessionState::Absent);
        assert!(!gate.is_loading());
    }

    #[tokio::test]
    async fn check_runs_at_most_once() {
        let gate = SessionGate::new(FakeIdentity {
            me: Some(user("ada")),
            ..Default::default()
        });
        let first = gate.resolve_session().await;
        let second = gate.resolve_session().await;
        assert_eq!(first, second);
        assert_eq!(gate.identity.me_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_check() {
        let hold = Arc::new(Notify::new());
        let gate = Arc::new(SessionGate::new(FakeIdentity {
            me: Some(user("ada")),
            hold: Some(hold.clone()),
            ..Default::default()
        }));

        let first = tokio::spawn({
            let gate = gate.clone();
            async move { gate.resolve_session().await }
        });
        let second = tokio::spawn({
            let gate = gate.clone();
            async move { gate.resolve_session().await }
        });
        tokio::task::yield_now().await;
        hold.notify_one();

        assert!(first.await.unwrap().is_resolved());
        assert!(second.await.unwrap().is_resolved());
        assert_eq!(gate.identity.me_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn teardown_mid_check_discards_result() {
        let hold = Arc::new(Notify::new());
        let gate = Arc::new(SessionGate::new(FakeIdentity {
            me: Some(user("ada")),
            hold: Some(hold.clone()),
            ..Default::default()
        }));
        let store = gate.store();

        let check = tokio::spawn({
            let gate = gate.clone();
            async move { gate.resolve_session().await }
        });
        tokio::task::yield_now().await;
        gate.shutdown();
        hold.notify_one();

        assert_eq!(check.await.unwrap(), SessionState::Unresolved);
        assert_eq!(store.current(), SessionState::Unresolved);
        assert!(gate.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_check_settles_absent() {
        let hold = Arc::new(Notify::new());
        let gate = SessionGate::new(FakeIdentity {
            me: Some(user("ada")),
            hold: Some(hold),
            ..Default::default()
        });

        let first = tokio::time::timeout(Duration::from_secs(1), gate.resolve_session()).await;
        assert!(first.is_err());
        assert!(!gate.is_loading());

        let second = tokio::time::timeout(Duration::from_secs(3600), gate.resolve_session())
            .await
            .expect("second call must not wait on the abandoned check");
        assert_eq!(second, SessionState::Absent);
        assert_eq!(gate.identity.me_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn abandoned_check_after_teardown_leaves_session_unresolved() {
        let hold = Arc::new(Notify::new());
        let gate = SessionGate::new(FakeIdentity {
            hold: Some(hold),
            ..Default::default()
        });

        {
            let check = gate.resolve_session();
            tokio::pin!(check);
            assert!(poll_once(check.as_mut()).await.is_none());
            gate.shutdown();
        }

        assert_eq!(gate.store().current(), SessionState::Unresolved);
        assert!(gate.is_loading());
    }

    /// Poll a future exactly once.
    async fn poll_once<F: std::future::Future + Unpin>(mut fut: F) -> Option<F::Output> {
        std::future::poll_fn(|cx| {
            std::task::Poll::Ready(match std::future::Future::poll(std::pin::Pin::new(&mut fut), cx) {
                std::task::Poll::Ready(out) => Some(out),
                std::task::Poll::Pending => None,
            })
        })
        .await
    }

    #[tokio::test]
    async fn sign_in_replaces_session() {
        let gate = SessionGate::new(FakeIdentity::default());
        gate.resolve_session().await;

        let err = gate
            .sign_in(&Credentials::new("grace@example.com", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(gate.store().current(), SessionState::Absent);

        gate.sign_in(&Credentials::new("grace@example.com", "correct"))
            .await
            .unwrap();
        assert_eq!(gate.store().user().unwrap().username, "grace");
    }

    #[tokio::test]
    async fn sign_up_signs_in_new_user() {
        let gate = SessionGate::new(FakeIdentity::default());
        gate.resolve_session().await;
        gate.sign_up(&SignUpRequest::new("linus", "linus@example.com", "pw"))
            .await
            .unwrap();
        assert_eq!(gate.store().user().unwrap().username, "linus");
    }

    #[tokio::test]
    async fn sign_in_before_check_returns_wins() {
        let hold = Arc::new(Notify::new());
        let gate = Arc::new(SessionGate::new(FakeIdentity {
            hold: Some(hold.clone()),
            ..Default::default()
        }));
        let check = tokio::spawn({
            let gate = gate.clone();
            async move { gate.resolve_session().await }
        });
        tokio::task::yield_now().await;

        gate.sign_in(&Credentials::new("grace@example.com", "correct"))
            .await
            .unwrap();
        hold.notify_one();

        let state = check.await.unwrap();
        assert_eq!(state.user().unwrap().username, "grace");
    }

    #[tokio::test]
    async fn sign_out_clears_session_and_navigates_to_signin() {
        let gate = SessionGate::new(FakeIdentity {
            me: Some(user("ada")),
            ..Default::default()
        });
        gate.resolve_session().await;
        let history = History::new("/settings");

        gate.sign_out(&history).await.unwrap();
        assert_eq!(gate.store().current(), SessionState::Absent);
        assert_eq!(history.entries(), vec!["/settings", "/signin"]);
    }

    #[tokio::test]
    async fn failed_sign_out_keeps_session() {
        let gate = SessionGate::new(FakeIdentity {
            me: Some(user("ada")),
            sign_out_fails: true,
            ..Default::default()
        });
        gate.resolve_session().await;
        let history = History::new("/");

        assert!(gate.sign_out(&history).await.is_err());
        assert!(gate.store().user().is_some());
        assert_eq!(history.navigation_count(), 0);
    }
}
