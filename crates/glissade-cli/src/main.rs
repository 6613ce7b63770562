use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glissade_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "glissade")]
#[command(author, version, about = "Smooth, interruptible scrolling")]
struct Cli {
    /// Configuration file (defaults to ~/.config/glissade/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through a file with smooth scrolling
    View {
        /// File to display
        file: PathBuf,
        /// Friction for keyboard scrolling, in [0, 1]
        #[arg(long)]
        friction: Option<f64>,
        /// Leave the mouse to the terminal
        #[arg(long)]
        no_mouse: bool,
    },
    /// Run a scripted scenario on a headless surface and print each frame
    Simulate(commands::simulate::SimulateArgs),
    /// Print the effective configuration
    Config {
        /// Write the configuration file with every default filled in
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load()?,
    };

    match cli.command {
        Commands::View {
            file,
            friction,
            no_mouse,
        } => {
            // The pager owns the terminal, so logs go to a file
            init_file_logging(&config)?;
            commands::view::run(config, &file, friction, no_mouse)
        }
        Commands::Simulate(args) => {
            init_logging(&config);
            commands::simulate::run(&config, args)
        }
        Commands::Config { save } => {
            init_logging(&config);
            commands::config::run(&config, cli.config.as_deref(), save)
        }
    }
}

fn env_filter(config: &AppConfig) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    )
}

/// Log to stderr, keeping stdout for command output
fn init_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn init_file_logging(config: &AppConfig) -> Result<()> {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
