use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tally_cli::commands::{self, achievements, calendar, habits, import};
use tally_cli::{Cli, Commands, Config};
use tally_core::AchievementDispatcher;
use tally_db::{Database, SharedDatabase};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(SharedDatabase, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok((SharedDatabase::new(db), config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (db, config) = open_database(cli.config.as_deref())?;
    let owner = config.owner_id().context("invalid owner in configuration")?;
    let engine = commands::engine(&db);
    let dispatcher = AchievementDispatcher::spawn(engine.clone());
    let mut out = io::stdout().lock();

    let result = match command {
        Commands::Calendar(args) => calendar::run(&mut out, &db, &owner, args).await,
        Commands::Month(args) => calendar::run_month(&mut out, &db, &owner, args).await,
        Commands::Habits(action) => habits::run(&mut out, &db, &owner, action, &dispatcher).await,
        Commands::Achievements(action) => achievements::run(&mut out, &engine, &owner, action).await,
        Commands::Import(args) => import::run(&mut out, &db, &owner, &dispatcher, args).map(|_| ()),
    };

    // Queued evaluations finish before exit; their outcome only reaches the log.
    dispatcher.shutdown().await;
    result
}
