//! mcg-upgrade - one-shot startup upgrade pass for an MCGalaxy server folder
//!
//! Resolves the server root, opens the database, runs every upgrade step in
//! order and exits. Step failures are logged, never fatal; only setup
//! problems (bad config, unopenable database) end the process with an error.

use anyhow::{bail, Context, Result};
use clap::Parser;
use mcg_common::config::{resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV};
use mcg_common::db::open_database;
use mcg_common::ServerLayout;
use mcg_upgrade::logging::{apply_config_level, init_tracing};
use mcg_upgrade::{MigrationStep, Orchestrator, UpgradeContext, UpgradeSettings, STARTUP_STEPS};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "mcg-upgrade")]
#[command(about = "Upgrade legacy MCGalaxy files and database rows in place")]
#[command(version)]
struct Args {
    /// Server root folder (overrides MCG_ROOT_FOLDER and the config file)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file (default: platform config locations)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database file, relative to the root folder unless absolute
    #[arg(long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Run only these steps (repeatable)
    #[arg(long = "only", value_name = "STEP")]
    only: Vec<String>,

    /// List step names in run order and exit
    #[arg(long)]
    list: bool,
}

fn selected_steps(names: &[String]) -> Result<Vec<MigrationStep>> {
    names
        .iter()
        .map(|name| match MigrationStep::from_name(name) {
            Some(step) => Ok(step),
            None => bail!("Unknown step: {} (see --list)", name),
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.list {
        for step in STARTUP_STEPS {
            println!("{}", step);
        }
        return Ok(());
    }

    let log_filter = init_tracing();

    let config = TomlConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Err(e) = apply_config_level(&log_filter, &config.logging.level) {
        warn!("Ignoring log level {:?}: {}", config.logging.level, e);
    }

    info!(
        "Starting mcg-upgrade v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let orchestrator = if args.only.is_empty() {
        Orchestrator::startup()
    } else {
        Orchestrator::only(&selected_steps(&args.only)?)
    };

    let root = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &config);
    if !root.is_dir() {
        bail!("Server root folder does not exist: {}", root.display());
    }
    info!("Server root: {}", root.display());
    let layout = ServerLayout::new(root);

    let configured_db = args.database.as_deref().or(config.database.as_deref());
    let db_path = layout.database_path(configured_db);
    let mut ctx = UpgradeContext::new(layout).with_settings(UpgradeSettings::from(&config.upgrade));

    // Never create a database just to find it has nothing to upgrade
    if db_path.exists() {
        let pool = open_database(&db_path)
            .await
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;
        ctx = ctx.with_database(pool);
    } else {
        warn!("Database {} not found - skipping database steps", db_path.display());
    }

    let summary = orchestrator.run(&ctx).await;

    let failed: Vec<MigrationStep> = summary.failed().collect();
    if !failed.is_empty() {
        warn!("{} steps failed and will be retried next run", failed.len());
    }

    if let Some(pool) = ctx.db {
        pool.close().await;
    }
    Ok(())
}
