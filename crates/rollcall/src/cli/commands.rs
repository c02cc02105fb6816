//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Interactive shell arguments.
#[derive(Debug, Default, Args)]
pub struct ShellCommand {
    /// Start offline regardless of the network (shows the offline game)
    #[arg(long)]
    pub offline: bool,

    /// Print links instead of opening them
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Link composition arguments.
#[derive(Debug, Args)]
pub struct LinkCommand {
    /// Recipient phone number (any formatting; non-digits are dropped)
    pub phone: String,

    /// Message text
    pub message: String,
}

/// Single-message send arguments.
#[derive(Debug, Args)]
pub struct SendCommand {
    /// Recipient phone number
    pub phone: String,

    /// Message text
    pub message: String,

    /// Print the link instead of opening it
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
