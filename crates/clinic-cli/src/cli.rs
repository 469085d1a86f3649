//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::Command;

/// Backend used when neither `--api-url` nor `CLINIC_API_URL` is set.
pub const DEFAULT_API_URL: &str = "https://ca2-med-api.vercel.app";

/// Clinic administration client.
#[derive(Parser, Debug)]
#[command(name = "clinic")]
#[command(author, version = env!("CLINIC_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the backend and the stored session live.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Backend base URL
    #[arg(long, env = "CLINIC_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Session file [default: session.json in the platform data directory]
    #[arg(long, env = "CLINIC_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "clinic",
            "list",
            "doctors",
            "--api-url",
            "http://localhost:3000",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.api_url, "http://localhost:3000");
    }
}
