//! Catalog browser driver.
//!
//! Reads commands from stdin, drives the catalog query engine, and prints
//! every settled state snapshot.
//!
//! Usage:
//!   catalog --fixture catalog-cli/fixtures/products.json
//!   catalog --config catalog.toml --verbose

use anyhow::{Context, Result};
use catalog_cli::{CliConfig, StoreConfig, build_store, run_session};
use catalog_engine::CatalogEngine;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(about = "Browse a product catalog from the terminal")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed an in-memory store from this JSON fixture (overrides [store])
    #[arg(short, long)]
    fixture: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let mut config = CliConfig::load(args.config.as_deref())?;
    if let Some(fixture) = args.fixture {
        config.store = StoreConfig::Memory {
            fixture: Some(fixture),
        };
    }

    let store = build_store(&config.store, &config.engine.collection)?;
    let engine = CatalogEngine::new(store, config.engine).context("failed to start engine")?;

    // Everything the session reports goes to stdout, logs go to stderr.
    let (output, mut reports) = mpsc::unbounded_channel::<String>();
    let stdout = tokio::spawn(async move {
        while let Some(report) = reports.recv().await {
            println!("{report}");
        }
    });

    info!("catalog ready, type `help` for commands");
    run_session(engine, BufReader::new(tokio::io::stdin()), output).await?;
    stdout.await.context("stdout writer failed")?;

    info!("bye");
    Ok(())
}
