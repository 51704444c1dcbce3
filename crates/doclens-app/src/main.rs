//! DocLens CLI entry point.
//!
//! Binary name: `doclens`
//!
//! Parses CLI arguments, sets up tracing, loads configuration and the saved
//! session, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    doclens_observe::tracing_setup::init_tracing(
        cli::log_directives(cli.verbose, cli.quiet),
        cli.log_format,
        cli.otel,
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "doclens", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    doclens_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init(cli.api_url.clone(), cli.tick_ms).await?;
    tracing::debug!(api = %state.config.api_base_url, tick = ?state.reveal_tick, "client configured");

    let result = match cli.command {
        Commands::Open { path } => cli::page::open(&state, &path, cli.json, cli.quiet).await,

        Commands::Chat { id, no_stream } => {
            cli::chat::show_chat(&state, &id, no_stream, cli.json, cli.quiet).await
        }

        Commands::Signin { email } => cli::auth::sign_in(&state, email, cli.json).await,

        Commands::Signup { username, email } => {
            cli::auth::sign_up(&state, username, email, cli.json).await
        }

        Commands::Signout => cli::auth::sign_out(&state, cli.json).await,

        Commands::Whoami => cli::auth::whoami(&state, cli.json).await,

        Commands::Completions { .. } => unreachable!("handled above"),
    };

    state.gate.shutdown();
    result
}
