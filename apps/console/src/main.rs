use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use client_core::CrmStore;
use tracing_subscriber::EnvFilter;

mod config;
mod repl;

use config::load_settings;
use repl::Console;

#[derive(Parser, Debug)]
#[command(about = "Manage client records from the terminal")]
struct Cli {
    /// Config file; falls back to $CRM_CONFIG, then ./crm.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print events and snapshots as JSON lines
    #[arg(long)]
    json: bool,
    /// Start with an empty registry regardless of configuration
    #[arg(long)]
    no_seed: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let accounts = settings.credentials.entries().len();
    let mut store =
        CrmStore::from_settings(settings.credentials, settings.seed_demo_clients && !cli.no_seed);
    tracing::info!(
        clients = store.registry().len(),
        accounts,
        "starting crm console"
    );

    let stdin = io::stdin();
    Console::new(&mut store, stdin.lock(), io::stdout(), cli.json).run()
}
