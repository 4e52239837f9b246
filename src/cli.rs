// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_PATH;
use crate::types::StatusCode;

/// Command-line arguments for `sharepush`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sharepush",
    version,
    about = "Publish files from a watched share in batches once activity settles.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SHAREPUSH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate the config, print the effective settings, and exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Print a sample configuration file to stdout and exit.
    #[arg(long)]
    pub print_default_config: bool,

    /// Send a single status code to the configured endpoints and exit.
    #[arg(long, value_name = "CODE")]
    pub send_status: Option<StatusCode>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_code_argument() {
        let args = CliArgs::try_parse_from(["sharepush", "--send-status", "sync-done"]).unwrap();
        assert_eq!(args.send_status, Some(StatusCode::SyncDone));
        assert_eq!(args.config, DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn rejects_unknown_status_code() {
        assert!(CliArgs::try_parse_from(["sharepush", "--send-status", "hello"]).is_err());
    }
}
