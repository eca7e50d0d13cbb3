//! snowcard CLI
//!
//! A winter greeting card that plays out in the terminal.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use snowcard::config::{self, Config};
use snowcard::logging;
use snowcard::registry::{self, ScreenId, Trigger};
use snowcard::tui;

#[derive(Parser)]
#[command(name = "snowcard")]
#[command(about = "A winter greeting card for the terminal")]
#[command(version)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the experience (default)
    Play {
        /// Screen to start on
        #[arg(long, value_parser = parse_screen)]
        start: Option<ScreenId>,
    },

    /// Print the screen path and its transitions
    Screens,

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_screen(name: &str) -> Result<ScreenId, String> {
    ScreenId::from_name(name).ok_or_else(|| {
        let valid: Vec<&str> = ScreenId::ALL.iter().map(|id| id.name()).collect();
        format!("unknown screen '{}' (expected one of: {})", name, valid.join(", "))
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::default_config_path);

    let result = match cli.command.unwrap_or(Commands::Play { start: None }) {
        Commands::Play { start } => {
            let log_dir = cli.log_dir.unwrap_or_else(logging::default_log_dir);
            cmd_play(&config_path, &log_dir, cli.debug, start.unwrap_or(ScreenId::START))
        }
        Commands::Screens => cmd_screens(),
        Commands::InitConfig { force } => cmd_init_config(&config_path, force),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_play(config_path: &Path, log_dir: &Path, debug: bool, start: ScreenId) -> Result<()> {
    // Held until exit so buffered log lines are flushed.
    let _guard = logging::setup_logging(log_dir, debug)?;

    let config = config::load(config_path)?;
    tui::run::run(config, start).context("terminal error")?;

    Ok(())
}

fn cmd_screens() -> Result<()> {
    println!("Path:");
    for (step, id) in ScreenId::ALL.iter().enumerate() {
        println!("  {}. {}", step + 1, id);
    }

    println!();
    println!("Transitions:");
    for edge in registry::edges() {
        let trigger = match edge.trigger {
            Trigger::Completion => "on completion",
            Trigger::UserConfirm => "on confirm",
            Trigger::Restart => "on restart",
        };
        println!("  {:<14} -> {:<14} {}", edge.from.name(), edge.to.name(), trigger);
    }

    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    config::save(&Config::default(), path)?;
    println!("Wrote default configuration to {}", path.display());

    Ok(())
}
