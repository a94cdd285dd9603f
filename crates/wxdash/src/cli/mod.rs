//! Command-line interface for wxdash.
//!
//! This module provides the CLI structure for the `wxdash` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DashboardCommand, FetchCommand, HistoryCommand, OutputFormat, StatusCommand,
};

use crate::logging::Verbosity;

/// wxdash - Live weather for one city, with history
///
/// Polls OpenWeatherMap for the chosen city, stores every reading in a local
/// SQLite database and charts the recent trend in the terminal.
#[derive(Debug, Parser)]
#[command(name = "wxdash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute (defaults to the dashboard)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the live dashboard
    Dashboard(DashboardCommand),

    /// Fetch and store the current weather once
    Fetch(FetchCommand),

    /// Print stored readings for a city
    History(HistoryCommand),

    /// Show database statistics
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }

    /// The command to run, with the dashboard as the default.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Dashboard(DashboardCommand::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: None,
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "wxdash");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_dashboard() {
        let cli = Cli::try_parse_from(["wxdash"]).unwrap();
        assert!(matches!(cli.into_command(), Command::Dashboard(_)));
    }

    #[test]
    fn test_parse_dashboard_with_city() {
        let cli = Cli::try_parse_from(["wxdash", "dashboard", "New York", "-r", "60"]).unwrap();
        match cli.into_command() {
            Command::Dashboard(cmd) => {
                assert_eq!(cmd.city.as_deref(), Some("New York"));
                assert_eq!(cmd.refresh, Some(60));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_dashboard_rejects_zero_refresh() {
        assert!(Cli::try_parse_from(["wxdash", "dashboard", "-r", "0"]).is_err());
    }

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from(["wxdash", "fetch", "Paris", "--json", "--no-save"]).unwrap();
        match cli.into_command() {
            Command::Fetch(cmd) => {
                assert_eq!(cmd.city.as_deref(), Some("Paris"));
                assert!(cmd.json);
                assert!(cmd.no_save);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_history_defaults() {
        let cli = Cli::try_parse_from(["wxdash", "history"]).unwrap();
        match cli.into_command() {
            Command::History(cmd) => {
                assert!(cmd.city.is_none());
                assert_eq!(cmd.limit, 50);
                assert_eq!(cmd.format, OutputFormat::Table);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["wxdash", "status", "--json"]).unwrap();
        assert!(matches!(cli.into_command(), Command::Status(StatusCommand { json: true })));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["wxdash", "config", "validate", "-f", "/tmp/wx.toml"]).unwrap();
        match cli.into_command() {
            Command::Config(ConfigCommand::Validate { file }) => {
                assert_eq!(file, Some(PathBuf::from("/tmp/wx.toml")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_global_flags() {
        let cli = Cli::try_parse_from(["wxdash", "-c", "/custom/config.toml", "-v", "status"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 1);
    }
}
