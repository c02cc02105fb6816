//! `rollcall` - CLI for the guardian roster
//!
//! This binary provides the interactive shell and one-shot commands for
//! composing and opening messaging links.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use rollcall::cli::{Cli, Command, ConfigCommand, LinkCommand, SendCommand, ShellCommand};
use rollcall::config::ConnectivityMode;
use rollcall::connectivity::{ConnectivityProbe, TcpProbe};
use rollcall::link::phone_advisory;
use rollcall::shell::run_game;
use rollcall::{
    dispatch, init_logging, Config, Connectivity, ConnectivityMonitor, Shell,
};

// Platform-specific imports using conditional compilation
#[cfg(target_os = "linux")]
use rollcall_linux as platform;

#[cfg(target_os = "macos")]
use rollcall_mac as platform;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);

    match cli.command {
        Command::Shell(cmd) => handle_shell(&config, &cmd),
        Command::Link(cmd) => {
            handle_link(&config, &cmd);
            Ok(())
        }
        Command::Send(cmd) => handle_send(&config, &cmd),
        Command::Game => {
            let mut stdout = io::stdout();
            run_game(config.game.clone(), io::stdin().lock(), &mut stdout)?;
            Ok(())
        }
        Command::Status(cmd) => handle_status(&config, &config_path, cmd.json),
        Command::Config(cmd) => handle_config(&config, &config_path, cmd),
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("starting async runtime")
}

fn effective_mode(config: &Config, force_offline: bool) -> ConnectivityMode {
    if force_offline {
        ConnectivityMode::Offline
    } else {
        config.connectivity.mode
    }
}

fn handle_shell(config: &Config, cmd: &ShellCommand) -> anyhow::Result<()> {
    let dispatcher = dispatch::from_config(&config.dispatch, cmd.dry_run)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    info!(opener = dispatcher.name(), "Starting shell");
    match effective_mode(config, cmd.offline) {
        ConnectivityMode::Probe => {
            let rt = runtime()?;
            let probe = TcpProbe::new(&config.connectivity.probe_addr, config.probe_timeout());
            let handle = rt.block_on(ConnectivityMonitor::start(probe, config.poll_interval()));

            let mut shell = Shell::new(config, dispatcher.as_ref(), handle.clone());
            let result = shell.run(stdin.lock(), &mut stdout);
            handle.stop();
            result?;
        }
        ConnectivityMode::Online => {
            Shell::new(config, dispatcher.as_ref(), Connectivity::Online)
                .run(stdin.lock(), &mut stdout)?;
        }
        ConnectivityMode::Offline => {
            Shell::new(config, dispatcher.as_ref(), Connectivity::Offline)
                .run(stdin.lock(), &mut stdout)?;
        }
    }
    Ok(())
}

fn warn_on_phone(phone: &str) {
    if let Some(advisory) = phone_advisory(phone) {
        warn!(%advisory, "Phone number looks unusual");
    }
}

fn handle_link(config: &Config, cmd: &LinkCommand) {
    warn_on_phone(&cmd.phone);
    println!("{}", config.link_composer().compose(&cmd.phone, &cmd.message));
}

fn handle_send(config: &Config, cmd: &SendCommand) -> anyhow::Result<()> {
    let dispatcher = dispatch::from_config(&config.dispatch, cmd.dry_run)?;
    warn_on_phone(&cmd.phone);
    dispatch::send_to_phone(
        dispatcher.as_ref(),
        &config.link_composer(),
        &cmd.phone,
        &cmd.message,
    )?;
    info!(opener = dispatcher.name(), "Opened message link");
    Ok(())
}

fn platform_name() -> &'static str {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        platform::platform_name()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        "unsupported"
    }
}

fn handle_status(config: &Config, config_path: &Path, json: bool) -> anyhow::Result<()> {
    let connectivity = match config.connectivity.mode {
        ConnectivityMode::Online => Connectivity::Online,
        ConnectivityMode::Offline => Connectivity::Offline,
        ConnectivityMode::Probe => {
            let probe = TcpProbe::new(&config.connectivity.probe_addr, config.probe_timeout());
            runtime()?.block_on(probe.probe())
        }
    };
    let opener = dispatch::from_config(&config.dispatch, false)?.name();

    if json {
        let status = serde_json::json!({
            "platform": platform_name(),
            "connectivity": connectivity,
            "mode": config.connectivity.mode.to_string(),
            "probe_addr": config.connectivity.probe_addr,
            "opener": opener,
            "base_url": config.messaging.base_url,
            "config_path": config_path,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("rollcall status");
        println!("---------------");
        println!("Platform:      {}", platform_name());
        println!("Connectivity:  {connectivity}");
        println!("Mode:          {}", config.connectivity.mode);
        println!("Probe address: {}", config.connectivity.probe_addr);
        println!("Opener:        {opener}");
        println!("Link base:     {}", config.messaging.base_url);
        println!("Config:        {}", config_path.display());
    }
    Ok(())
}

fn handle_config(config: &Config, config_path: &Path, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Messaging]");
                println!("  Base URL:           {}", config.messaging.base_url);
                println!("  Sender phone:       {}", config.messaging.sender_phone);
                println!();
                println!("[Dispatch]");
                println!(
                    "  Opener:             {}",
                    config.dispatch.opener.as_deref().unwrap_or("(platform default)")
                );
                println!("  Dry run:            {}", config.dispatch.dry_run);
                println!();
                println!("[Connectivity]");
                println!("  Mode:               {}", config.connectivity.mode);
                println!("  Probe address:      {}", config.connectivity.probe_addr);
                println!(
                    "  Probe timeout (ms): {}",
                    config.connectivity.probe_timeout_ms
                );
                println!(
                    "  Poll interval (ms): {}",
                    config.connectivity.poll_interval_ms
                );
                println!();
                println!("[Game]");
                println!("  Upper bound:        {}", config.game.upper_bound);
                println!("  Max guesses:        {}", config.game.max_guesses);
            }
        }
        ConfigCommand::Path => {
            println!("{}", config_path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(|| config_path.to_path_buf());
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("configuration error in {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
