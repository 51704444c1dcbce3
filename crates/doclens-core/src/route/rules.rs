//! Route classification and the route protection rule.
//!
//! Both functions are pure: the controller feeds them the current session
//! state and path and acts on the returned [`RouteDecision`].

use doclens_types::route::{HOME_PATH, PUBLIC_PATHS, RouteClass, RouteDecision, SIGNIN_PATH};
use doclens_types::session::SessionState;

/// Classify a path. Public iff it is exactly one of [`PUBLIC_PATHS`].
pub fn classify_route(path: &str) -> RouteClass {
    if PUBLIC_PATHS.contains(&path) {
        RouteClass::Public
    } else {
        RouteClass::Protected
    }
}

/// Decide what to show for a session state on a route of the given class.
///
/// Never navigates while the session is unresolved.
pub fn enforce(session: &SessionState, class: RouteClass) -> RouteDecision {
    match (session, class) {
        (SessionState::Unresolved, _) => RouteDecision::Loading,
        (SessionState::Present(_), RouteClass::Public) => RouteDecision::Redirect(HOME_PATH),
        (SessionState::Absent, RouteClass::Protected) => RouteDecision::Redirect(SIGNIN_PATH),
        (SessionState::Present(_), RouteClass::Protected) => RouteDecision::Render { chrome: true },
        (SessionState::Absent, RouteClass::Public) => RouteDecision::Render { chrome: false },
    }
}
