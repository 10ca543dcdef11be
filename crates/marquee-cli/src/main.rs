use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about = "An animated terminal landing page with a typewriter hero")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the landing page
    Run,
    /// Type a line of text onto the terminal
    Type {
        /// Text to type
        text: String,
        /// Milliseconds between characters (defaults to the configured speed)
        #[arg(short, long)]
        speed: Option<u64>,
        /// Milliseconds to wait before the first character is scheduled
        #[arg(short, long, default_value_t = 0)]
        delay: u64,
    },
    /// Show or create the config file
    Config {
        /// Write the default config if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    match cli.command {
        Some(Commands::Run) | None => {
            // The page owns the terminal, so logs go to a file
            let path = config.log_file();
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating log directory {}", dir.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();

            commands::run::run(config).await
        }
        Some(Commands::Type { text, speed, delay }) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();

            let speed = speed
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.typewriter.speed());
            commands::type_text::run(&text, speed, Duration::from_millis(delay)).await
        }
        Some(Commands::Config { init }) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .init();

            commands::config::run(&config, init)
        }
    }
}
