use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cve_ingest::batch::run_batch;
use cve_ingest::config::{self, IngestConfig};
use cve_ingest::db::{schema, DbPool};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (default: cve-ingest.toml or $CVE_INGEST_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of CVE JSON documents to ingest (default: from config)
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Directory failed documents are moved to (default: from config)
    #[arg(short, long)]
    quarantine_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()) // uses RUST_LOG
        .init();
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut cfg: IngestConfig = match &args.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    if let Some(input_dir) = args.input_dir {
        cfg.paths.input_dir = input_dir;
    }
    if let Some(quarantine_dir) = args.quarantine_dir {
        cfg.paths.quarantine_dir = quarantine_dir;
    }
    config::debug_print_config(&cfg);

    let engine = cfg.database.engine()?;
    info!("🚀 Connecting to {engine} database");
    let pool = DbPool::connect(engine, &cfg.database.url)
        .await
        .context("connecting to database")?;
    schema::init(&pool).await.context("initializing schema")?;

    let stats = run_batch(&pool, &cfg.paths.input_dir, &cfg.paths.quarantine_dir).await?;
    info!("📊 Ingest finished: {stats}");

    Ok(())
}
