//! CLI command definitions and dispatch for the `doclens` binary.
//!
//! Uses clap derive macros for argument parsing. Every page-showing command
//! goes through the session gate and route controller, so a signed-out user
//! is sent to the sign-in page exactly like in the web client.

pub mod auth;
pub mod chat;
pub mod page;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use doclens_observe::tracing_setup::LogFormat;

/// Chat with your documents from the terminal.
#[derive(Parser)]
#[command(name = "doclens", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Base URL of the DocLens service (overrides config.toml).
    #[arg(long, env = "DOCLENS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Delay between revealed characters in milliseconds (overrides config.toml).
    #[arg(long, global = true)]
    pub tick_ms: Option<u64>,

    /// Log line format on stderr.
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a page by path (e.g. `/`, `/signin`, `/upload`).
    Open {
        /// Page path.
        path: String,
    },

    /// Show a chat and replay the latest assistant reply.
    Chat {
        /// Chat ID.
        id: String,

        /// Print the latest reply at once instead of revealing it.
        #[arg(long)]
        no_stream: bool,
    },

    /// Sign in to the DocLens service.
    #[command(alias = "login")]
    Signin {
        /// Account email (prompted when omitted).
        #[arg(long)]
        email: Option<String>,
    },

    /// Create an account and sign in.
    Signup {
        /// Username (prompted when omitted).
        #[arg(long)]
        username: Option<String>,

        /// Account email (prompted when omitted).
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out and forget the saved session.
    #[command(alias = "logout")]
    Signout,

    /// Show the signed-in user.
    Whoami,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Default tracing directives for the given verbosity flags.
pub fn log_directives(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,doclens_core=debug,doclens_infra=debug,doclens_app=debug",
        _ => "trace",
    }
}
