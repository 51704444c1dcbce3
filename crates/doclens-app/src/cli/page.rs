//! Page opening: session check, route protection and page display.
//!
//! `open_page` starts the one-shot session check, lets the route controller
//! react to it (redirecting where the rules say so) and returns the first
//! page the controller settles on. While the session is unresolved a
//! full-page spinner is shown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use doclens_core::route::controller::{RouteController, View};
use doclens_core::route::navigator::History;
use doclens_core::session::gate::SessionGate;
use doclens_core::session::identity::IdentityService;
use doclens_types::route::{HOME_PATH, RouteClass, SIGNIN_PATH, SIGNUP_PATH};
use doclens_types::user::User;

use crate::state::AppState;

/// The page the route controller settled on.
pub struct OpenedPage {
    pub path: String,
    pub class: RouteClass,
    pub user: Option<User>,
    /// Every path visited, starting with the requested one.
    pub history: Vec<String>,
}

impl OpenedPage {
    /// Whether the controller moved away from the requested path.
    pub fn redirected(&self) -> bool {
        self.history.len() > 1
    }
}

/// Open `path`, resolving the session first.
pub async fn open_page<I>(
    gate: Arc<SessionGate<I>>,
    path: &str,
    show_spinner: bool,
) -> Result<OpenedPage>
where
    I: IdentityService + 'static,
{
    let history = Arc::new(History::new(path));

    let check_gate = gate.clone();
    let check = tokio::spawn(async move { check_gate.resolve_session().await });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();
    let controller = RouteController::new(gate.store(), history.clone());
    let controller_task = tokio::spawn(controller.run(
        move |view| {
            let _ = tx.send(view);
        },
        shutdown.clone(),
    ));

    let spinner = show_spinner.then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Checking session...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    });

    let mut settled = None;
    while let Some(view) = rx.recv().await {
        match view {
            View::Loading => continue,
            View::Page { path, class, user } => {
                settled = Some((path, class, user));
                break;
            }
        }
    }

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    shutdown.cancel();
    let _ = controller_task.await;
    let _ = check.await;

    let Some((path, class, user)) = settled else {
        bail!("route controller stopped before a page was shown");
    };

    tracing::debug!(%path, %class, "page opened");
    Ok(OpenedPage {
        path,
        class,
        user,
        history: history.entries(),
    })
}

/// `doclens open <path>`
pub async fn open(state: &AppState, path: &str, json: bool, quiet: bool) -> Result<()> {
    let page = open_page(state.gate.clone(), path, !json && !quiet).await?;
    print_page(&page, json)
}

/// Print a page: the chrome for signed-in pages, then the page body.
pub fn print_page(page: &OpenedPage, json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({
            "path": page.path,
            "class": page.class,
            "chrome": page.user.is_some(),
            "user": page.user,
            "redirected_from": page.redirected().then(|| &page.history[0]),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    if page.redirected() {
        println!(
            "  {} {} {}",
            style(&page.history[0]).dim(),
            style("->").dim(),
            style(&page.path).cyan()
        );
        println!();
    }

    if let Some(user) = &page.user {
        print_chrome(user);
    }

    match page.path.as_str() {
        SIGNIN_PATH => {
            println!("  {}", style("Sign in").bold());
            println!(
                "  {}",
                style("Run `doclens signin` to sign in, or `doclens signup` to create an account.")
                    .dim()
            );
        }
        SIGNUP_PATH => {
            println!("  {}", style("Create an account").bold());
            println!("  {}", style("Run `doclens signup` to get started.").dim());
        }
        HOME_PATH => {
            println!("  {}", style("Your documents").bold());
            println!("  {}", style("Open a chat with `doclens chat <id>`.").dim());
        }
        other => {
            println!("  {}", style(other).bold());
        }
    }
    println!();
    Ok(())
}

/// The authenticated chrome: who is signed in, and where to go.
pub fn print_chrome(user: &User) {
    println!(
        "  {} {}  {}",
        style("DocLens").cyan().bold(),
        style("|").dim(),
        style(format!("{} <{}>", user.username, user.email)).dim()
    );
    println!("  {}", style("---").dim());
}
