//! clinic - command-line front-end for the clinic administration API.
//!
//! Each subcommand is one screen of the admin front-end: it navigates to its
//! route, issues requests through the shared request policy and reacts to
//! failures the same way the screens do (redirect to login, notification or
//! inline field messages).

mod app;
mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::{App, Reported};
use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let mut app = App::connect(&cli.config).await?;
    let outcome = commands::handle(cli.command, &mut app).await;
    app.finish();

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Already shown to the user by the screen.
        Err(e) if e.is::<Reported>() => Ok(ExitCode::FAILURE),
        Err(e) => Err(e),
    }
}

/// Log to stderr so stdout stays machine-readable.
///
/// `CLINIC_LOG` takes `EnvFilter` directives and overrides `-v`. Without it,
/// the clinic crates log at the chosen level and dependencies at `warn`.
fn init_logging(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("CLINIC_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,clinic={level},clinic_core={level},clinic_http={level},clinic_store={level}"
        ))
    });

    let layer = fmt::layer().with_writer(std::io::stderr);
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_target(false))
            .init();
    }
}
