//! Account commands: sign-in, sign-up, sign-out and whoami.
//!
//! All transitions go through the [`SessionGate`](doclens_core::session::gate::SessionGate),
//! then the resulting session cookie is saved (or forgotten) so the next
//! invocation starts in the same state.

use std::time::Duration;

use anyhow::Result;
use console::style;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};

use doclens_core::route::navigator::{History, Navigator};
use doclens_types::auth::{Credentials, SignUpRequest};
use doclens_types::error::AuthError;
use doclens_types::route::HOME_PATH;
use doclens_types::session::SessionState;
use doclens_types::user::User;

use crate::state::AppState;

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn prompt_email(email: Option<String>) -> Result<String> {
    match email {
        Some(e) => Ok(e),
        None => Ok(Input::<String>::new().with_prompt("Email").interact_text()?),
    }
}

fn print_signed_in(user: &User, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(user)?);
    } else {
        println!(
            "  {} Signed in as {} ({})",
            style("✓").green().bold(),
            style(&user.username).cyan().bold(),
            style(&user.email).dim()
        );
    }
    Ok(())
}

/// Sign in with email and password.
///
/// # Interactive
/// doclens signin
///
/// # With the email given up front
/// doclens signin --email ada@example.com
pub async fn sign_in(state: &AppState, email: Option<String>, json: bool) -> Result<()> {
    let email = prompt_email(email)?;
    let password = Password::new()
        .with_prompt(format!("Password for {}", style(&email).bold()))
        .interact()?;

    let progress = spinner("Signing in...");
    let result = state.gate.sign_in(&Credentials::new(email, password)).await;
    progress.finish_and_clear();

    let user = result?;
    state.persist_session().await?;
    print_signed_in(&user, json)
}

/// Create an account and sign in.
pub async fn sign_up(
    state: &AppState,
    username: Option<String>,
    email: Option<String>,
    json: bool,
) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => Input::<String>::new().with_prompt("Username").interact_text()?,
    };
    let email = prompt_email(email)?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let progress = spinner("Creating account...");
    let result = state
        .gate
        .sign_up(&SignUpRequest::new(username, email, password))
        .await;
    progress.finish_and_clear();

    let user = result?;
    state.persist_session().await?;
    print_signed_in(&user, json)
}

/// Whether a failed sign-out means the service no longer knows the session.
fn session_already_gone(err: &AuthError) -> bool {
    matches!(err, AuthError::Rejected(401))
}

/// Sign out and forget the saved session cookie.
///
/// A 401 from the service means the saved session already expired; the
/// cookie is forgotten anyway and the command succeeds.
pub async fn sign_out(state: &AppState, json: bool) -> Result<()> {
    let history = History::new(HOME_PATH);
    let expired = match state.gate.sign_out(&history).await {
        Ok(()) => false,
        Err(e) if session_already_gone(&e) => {
            tracing::info!("saved session already expired, forgetting it");
            true
        }
        Err(e) => return Err(e.into()),
    };
    state.forget_session().await?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "signed_out": true,
                "expired": expired,
                "path": history.current_path(),
            })
        );
    } else if expired {
        println!(
            "  {} Session had already expired; saved session cleared",
            style("✓").green().bold()
        );
    } else {
        println!("  {} Signed out", style("✓").green().bold());
    }
    Ok(())
}

/// Show the signed-in user, resolving the session once.
pub async fn whoami(state: &AppState, json: bool) -> Result<()> {
    let session = state.gate.resolve_session().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    match session {
        SessionState::Present(user) => {
            println!();
            println!("  {}  {}", style("User:").bold(), style(&user.username).cyan());
            println!("  {}  {}", style("Email:").bold(), user.email);
            println!("  {}  {}", style("ID:").bold(), style(&user.id).dim());
            println!(
                "  {}  {}",
                style("Since:").bold(),
                style(user.created_at.format("%Y-%m-%d")).dim()
            );
            println!();
        }
        SessionState::Absent | SessionState::Unresolved => {
            println!(
                "  {} Not signed in. Run {} to sign in.",
                style("✗").red(),
                style("doclens signin").bold()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use doclens_infra::session_file::{load_session_cookie, save_session_cookie};
    use doclens_types::config::ClientConfig;

    async fn state_with_saved_cookie(server: &mockito::Server, dir: &tempfile::TempDir) -> AppState {
        save_session_cookie(dir.path(), "session=stale").await.unwrap();
        let config = ClientConfig {
            api_base_url: server.url(),
            ..Default::default()
        };
        AppState::with_config(config, dir.path().to_path_buf(), Duration::from_millis(1))
            .await
            .unwrap()
    }

    #[test]
    fn only_401_counts_as_gone() {
        assert!(session_already_gone(&AuthError::Rejected(401)));
        assert!(!session_already_gone(&AuthError::Rejected(500)));
        assert!(!session_already_gone(&AuthError::Transport("reset".into())));
    }

    #[tokio::test]
    async fn expired_session_sign_out_clears_saved_cookie() {
        let mut server = mockito::Server::new_async().await;
        let signout = server
            .mock("POST", "/api/signout")
            .with_status(401)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_saved_cookie(&server, &dir).await;

        sign_out(&state, true).await.unwrap();

        signout.assert_async().await;
        assert!(load_session_cookie(dir.path()).await.is_none());
    }

    #[tokio::test]
    async fn server_error_on_sign_out_keeps_saved_cookie() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/signout")
            .with_status(500)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_saved_cookie(&server, &dir).await;

        assert!(sign_out(&state, true).await.is_err());
        assert_eq!(
            load_session_cookie(dir.path()).await.as_deref(),
            Some("session=stale")
        );
    }
}
