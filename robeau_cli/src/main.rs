//! Robeau console - talk to a dialogue script from the terminal.

mod config;
mod console;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use robeau_core::{event_channel, Engine, Session};
use robeau_graph::MemoryGraph;

use crate::config::RobeauConfig;

#[derive(Parser, Debug)]
#[command(name = "robeau")]
#[command(about = "Converse with a Robeau dialogue script", long_about = None)]
struct Args {
    /// Dialogue script (.toml or .json)
    script: PathBuf,

    /// Configuration file with [engine] and [session] tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for weighted-random responses
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds of silence before a query window closes
    #[arg(long)]
    query_window: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RobeauConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => RobeauConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.engine.rng_seed = Some(seed);
    }
    if let Some(secs) = args.query_window {
        config.session.query_window_secs = secs;
    }

    let graph = MemoryGraph::load(&args.script)
        .with_context(|| format!("loading dialogue script {}", args.script.display()))?;

    let (events_tx, events_rx) = event_channel();
    let engine = Engine::new(Arc::new(graph), config.engine.clone()).with_events(events_tx);
    let printer = tokio::spawn(console::print_events(events_rx));
    let session = Session::start(engine);

    let outcome = console::run(&session, &config.session).await;

    // Dropping the session drops the engine's event sender, which ends the printer
    session
        .shutdown()
        .await
        .context("session ended on a fatal error")?;
    printer.await?;
    outcome
}
