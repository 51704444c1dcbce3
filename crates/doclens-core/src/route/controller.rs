//! Reactive route controller.
//!
//! Re-evaluates the route protection rule whenever the session state or the
//! current path changes, performs redirects through the [`Navigator`], and
//! emits the [`View`] to show. A redirect is issued at most once for a given
//! (path, target) pair, so repeated evaluations never loop.

use doclens_types::route::{RouteClass, RouteDecision};
use doclens_types::user::User;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::session::store::SessionStore;

use super::navigator::Navigator;
use super::rules::{classify_route, enforce};

/// What the shell should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Full-page loading indicator.
    Loading,
    /// The page at `path`. Protected pages carry the signed-in user and are
    /// wrapped in the authenticated chrome (sidebar/navigation).
    Page {
        path: String,
        class: RouteClass,
        user: Option<User>,
    },
}

impl View {
    /// Whether the authenticated chrome wraps this view.
    pub fn has_chrome(&self) -> bool {
        matches!(self, View::Page { user: Some(_), .. })
    }
}

/// Applies the route protection rule to a navigator.
pub struct RouteController<N: Navigator> {
    store: SessionStore,
    navigator: N,
    pending_redirect: Option<(String, &'static str)>,
}

impl<N: Navigator> RouteController<N> {
    pub fn new(store: SessionStore, navigator: N) -> Self {
        Self {
            store,
            navigator,
            pending_redirect: None,
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Evaluate the rule once against the current session and path.
    pub fn evaluate(&mut self) -> View {
        let session = self.store.current();
        let path = self.navigator.current_path();
        let class = classify_route(&path);

        match enforce(&session, class) {
            RouteDecision::Loading => View::Loading,
            RouteDecision::Redirect(target) => {
                let key = (path, target);
                if self.pending_redirect.as_ref() != Some(&key) {
                    info!(from = %key.0, to = target, session = %session, "redirect");
                    self.navigator.navigate(target);
                    self.pending_redirect = Some(key);
                }
                View::Loading
            }
            RouteDecision::Render { chrome } => {
                self.pending_redirect = None;
                View::Page {
                    path,
                    class,
                    user: if chrome { session.user().cloned() } else { None },
                }
            }
        }
    }

    /// Evaluate on every session or location change until `shutdown` fires.
    ///
    /// `on_view` receives the view after each evaluation, starting with one
    /// for the state at call time.
    pub async fn run<F>(mut self, mut on_view: F, shutdown: CancellationToken)
    where
        F: FnMut(View) + Send,
    {
        let mut session_rx = self.store.subscribe();
        let mut path_rx = self.navigator.subscribe();
        let mut session_open = true;
        let mut path_open = true;

        loop {
            session_rx.borrow_and_update();
            path_rx.borrow_and_update();
            on_view(self.evaluate());

            loop {
                if !session_open && !path_open {
                    debug!("session and location channels closed, stopping route controller");
                    return;
                }
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        debug!("route controller shut down");
                        return;
                    }
                    changed = session_rx.changed(), if session_open => {
                        if changed.is_ok() {
                            break;
                        }
                        session_open = false;
                    }
                    changed = path_rx.changed(), if path_open => {
                        if changed.is_ok() {
                            break;
                        }
                        path_open = false;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::route::navigator::History;
    use crate::session::store::session_channel;
    use chrono::Utc;
    use doclens_types::user::UserId;

    fn user() -> User {
        User {
            id: UserId::new("u-1"),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn loading_while_unresolved_without_navigation() {
        let (_writer, store) = session_channel();
        let mut controller = RouteController::new(store, History::new("/settings"));
        assert_eq!(controller.evaluate(), View::Loading);
        assert_eq!(controller.evaluate(), View::Loading);
        assert_eq!(controller.navigator().navigation_count(), 0);
    }

    #[test]
    fn absent_on_protected_paths_redirects_to_signin_once() {
        for path in ["/", "/settings", "/chat/abc", "/upload"] {
            let (writer, store) = session_channel();
            writer.set_absent().unwrap();
            let mut controller = RouteController::new(store, History::new(path));

            assert_eq!(controller.evaluate(), View::Loading);
            let view = controller.evaluate();
            assert_eq!(
                view,
                View::Page {
                    path: "/signin".to_string(),
                    class: RouteClass::Public,
                    user: None,
                }
            );
            controller.evaluate();
            assert_eq!(controller.navigator().entries(), vec![path, "/signin"]);
        }
    }

    #[test]
    fn present_on_public_paths_redirects_home_once() {
        for path in ["/signin", "/signup"] {
            let (writer, store) = session_channel();
            writer.set_present(user()).unwrap();
            let mut controller = RouteController::new(store, History::new(path));

            assert_eq!(controller.evaluate(), View::Loading);
            let view = controller.evaluate();
            assert!(view.has_chrome());
            controller.evaluate();
            assert_eq!(controller.navigator().entries(), vec![path, "/"]);
        }
    }

    #[test]
    fn redirect_not_repeated_while_navigation_pending() {
        struct StuckNavigator(History);
        impl Navigator for StuckNavigator {
            fn current_path(&self) -> String {
                self.0.current_path()
            }
            fn navigate(&self, path: &str) -> bool {
                // Record the attempt but never move.
                self.0.navigate(path);
                self.0.navigate("/settings");
                true
            }
            fn subscribe(&self) -> tokio::sync::watch::Receiver<String> {
                self.0.subscribe()
            }
        }

        let (writer, store) = session_channel();
        writer.set_absent().unwrap();
        let mut controller = RouteController::new(store, StuckNavigator(History::new("/settings")));
        for _ in 0..5 {
            assert_eq!(controller.evaluate(), View::Loading);
        }
        assert_eq!(controller.navigator().0.entries(), vec!["/settings", "/signin", "/settings"]);
    }

    #[tokio::test]
    async fn run_reacts_to_session_and_location_changes() {
        let (writer, store) = session_channel();
        let history = Arc::new(History::new("/signin"));
        let controller = RouteController::new(store, history.clone());
        let views = Arc::new(Mutex::new(Vec::new()));
        let shutdown = CancellationToken::new();

        let task = tokio::spawn({
            let views = views.clone();
            let shutdown = shutdown.clone();
            async move {
                controller
                    .run(move |view| views.lock().unwrap().push(view), shutdown)
                    .await;
            }
        });

        tokio::task::yield_now().await;
        writer.set_present(user()).unwrap();
        let mut rx = history.subscribe();
        rx.wait_for(|path| path == "/").await.unwrap();

        // Let the controller observe the navigation it triggered.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        shutdown.cancel();
        task.await.unwrap();

        let views = views.lock().unwrap().clone();
        assert_eq!(views.first(), Some(&View::Loading));
        assert!(views.last().unwrap().has_chrome());
        assert_eq!(history.entries(), vec!["/signin", "/"]);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let (writer, store) = session_channel();
        writer.set_absent().unwrap();
        let controller = RouteController::new(store, History::new("/signin"));
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let mut seen = Vec::new();
        controller.run(|view| seen.push(view), shutdown).await;
        assert_eq!(seen.len(), 1);
    }
}
