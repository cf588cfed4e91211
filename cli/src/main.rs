//! `trail`: run Trail engine operations against an LMDB data directory.

mod commands;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use trail_engine::{EngineConfig, TrailEngine};
use trail_store_lmdb::{environment::DEFAULT_MAP_SIZE, LmdbEnvironment};
use trail_types::SystemClock;
use trail_utils::LogFormat;

use commands::Command;

#[derive(Parser)]
#[command(name = "trail", version, about = "Token-weighted ballot voting engine")]
struct Cli {
    /// Data directory for the LMDB environment.
    #[arg(long, default_value = "./trail_data", env = "TRAIL_DATA_DIR")]
    data_dir: PathBuf,

    /// Path to a TOML engine configuration file.
    #[arg(long, env = "TRAIL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "warn", env = "TRAIL_LOG_LEVEL")]
    log_level: String,

    /// Log output format: "human" or "json".
    #[arg(long, default_value = "human", env = "TRAIL_LOG_FORMAT")]
    log_format: LogFormat,

    /// Maximum size of the LMDB map in bytes.
    #[arg(long, default_value_t = DEFAULT_MAP_SIZE, env = "TRAIL_MAP_SIZE")]
    map_size: usize,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    trail_utils::init_logging(cli.log_format, &cli.log_level)
        .context("failed to initialise logging")?;

    let config = match &cli.config {
        Some(path) => {
            let config = EngineConfig::from_toml_file(path)?;
            tracing::info!("loaded config from {}", path.display());
            config
        }
        None => EngineConfig::default(),
    };

    let env = LmdbEnvironment::open(&cli.data_dir, cli.map_size)
        .with_context(|| format!("failed to open {}", cli.data_dir.display()))?;
    let engine = TrailEngine::new(env, SystemClock, config);

    let output = commands::run(&engine, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    engine.store().sync()?;
    Ok(())
}
