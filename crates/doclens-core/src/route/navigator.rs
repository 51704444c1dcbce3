//! Navigation port and an in-memory history implementation.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::debug;

/// Port for changing the current location.
///
/// The route controller only needs the current path, a way to push a new one,
/// and a change notification.
pub trait Navigator: Send + Sync {
    /// The current path.
    fn current_path(&self) -> String;

    /// Push `path` as the new location.
    ///
    /// Returns `false` (and does nothing) when `path` is already current.
    fn navigate(&self, path: &str) -> bool;

    /// A receiver notified on every location change.
    fn subscribe(&self) -> watch::Receiver<String>;
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn navigate(&self, path: &str) -> bool {
        (**self).navigate(path)
    }

    fn subscribe(&self) -> watch::Receiver<String> {
        (**self).subscribe()
    }
}

/// In-memory navigation history.
///
/// Keeps every visited path in order so callers (and tests) can see exactly
/// which navigations happened.
#[derive(Debug)]
pub struct History {
    location: watch::Sender<String>,
    entries: Mutex<Vec<String>>,
}

impl History {
    /// Start a history at `initial_path`.
    pub fn new(initial_path: impl Into<String>) -> Self {
        let initial = normalize(&initial_path.into());
        let (location, _) = watch::channel(initial.clone());
        Self {
            location,
            entries: Mutex::new(vec![initial]),
        }
    }

    /// Every path visited so far, starting with the initial one.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Number of navigations performed after the initial location.
    pub fn navigation_count(&self) -> usize {
        self.entries().len().saturating_sub(1)
    }
}

impl Navigator for History {
    fn current_path(&self) -> String {
        self.location.borrow().clone()
    }

    fn navigate(&self, path: &str) -> bool {
        let path = normalize(path);
        let changed = self.location.send_if_modified(|current| {
            if *current == path {
                return false;
            }
            *current = path.clone();
            true
        });
        if changed {
            debug!(to = %path, "navigate");
            if let Ok(mut entries) = self.entries.lock() {
                entries.push(path);
            }
        }
        changed
    }

    fn subscribe(&self) -> watch::Receiver<String> {
        self.location.subscribe()
    }
}

/// Strip the query string and fragment; an empty path is the root.
fn normalize(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
