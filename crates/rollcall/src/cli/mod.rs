//! Command-line interface for rollcall.
//!
//! This module provides the CLI structure for the `rollcall` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, LinkCommand, SendCommand, ShellCommand, StatusCommand};

/// rollcall - Message your students' guardians
///
/// Keeps a roster of students and guardian phone numbers for the session,
/// and opens pre-filled messaging links to one guardian or a whole selection.
#[derive(Debug, Parser)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive roster shell
    Shell(ShellCommand),

    /// Print the messaging link for a phone number and message
    Link(LinkCommand),

    /// Open a message to one phone number
    Send(SendCommand),

    /// Play the offline guessing game
    Game,

    /// Show connectivity and platform status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                2 => crate::logging::Verbosity::Debug,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "rollcall");
    }

    #[test]
    fn test_verbosity_quiet() {
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(3, true).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Debug);
        assert_eq!(cli(3, false).verbosity(), Verbosity::Trace);
        assert_eq!(cli(9, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_shell() {
        let cli = Cli::try_parse_from(["rollcall", "shell", "--offline", "-n"]).unwrap();
        match cli.command {
            Command::Shell(cmd) => {
                assert!(cmd.offline);
                assert!(cmd.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_link() {
        let cli =
            Cli::try_parse_from(["rollcall", "link", "+964 770 123 4567", "Hello world"]).unwrap();
        match cli.command {
            Command::Link(cmd) => {
                assert_eq!(cmd.phone, "+964 770 123 4567");
                assert_eq!(cmd.message, "Hello world");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_send_requires_message() {
        assert!(Cli::try_parse_from(["rollcall", "send", "964"]).is_err());
        let cli = Cli::try_parse_from(["rollcall", "send", "964", "Hi", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Command::Send(SendCommand { dry_run: true, .. })));
    }

    #[test]
    fn test_parse_game() {
        let cli = Cli::try_parse_from(["rollcall", "game"]).unwrap();
        assert!(matches!(cli.command, Command::Game));
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["rollcall", "status", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Status(StatusCommand { json: true })));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["rollcall", "config", "validate", "-f", "/tmp/x.toml"]).unwrap();
        match cli.command {
            Command::Config(ConfigCommand::Validate { file }) => {
                assert_eq!(file, Some(PathBuf::from("/tmp/x.toml")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["rollcall", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["rollcall", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_with_quiet() {
        let cli = Cli::try_parse_from(["rollcall", "game", "-q"]).unwrap();
        assert!(cli.quiet);
    }
}
