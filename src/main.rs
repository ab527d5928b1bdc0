use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use std::fs::File;
use std::path::PathBuf;

use snake_ledger::account::{AccountStore, FileStore, MemoryStore};
use snake_ledger::game::GameConfig;
use snake_ledger::modes::HumanMode;

#[derive(Parser)]
#[command(name = "snake_ledger")]
#[command(version, about = "Snake with player accounts and a high-score leaderboard")]
struct Cli {
    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accounts file
    #[arg(long, default_value = "users.json")]
    users: PathBuf,

    /// Keep accounts in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Log verbosity
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut builder = env_logger::builder();

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder
                .filter_level(cli.log_level.into())
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
        // Nothing may write to the terminal while the game owns it
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }

    builder.init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }

    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

async fn play<S: AccountStore>(config: GameConfig, store: S) -> Result<()> {
    let mut human_mode = HumanMode::new(config, store);
    human_mode.run().await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = load_config(&cli)?;
    info!(
        "starting on a {}x{} grid",
        config.grid_width, config.grid_height
    );

    if cli.ephemeral {
        play(config, MemoryStore::new()).await
    } else {
        let store = FileStore::open(cli.users.clone())
            .with_context(|| format!("Failed to open accounts file {}", cli.users.display()))?;
        play(config, store).await
    }
}
