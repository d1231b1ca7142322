//! Scrivener MCP Server - Main entry point

use anyhow::Context;
use clap::Parser;
use scrivener_classifier::ClassificationEngine;
use scrivener_llm::OllamaProvider;
use scrivener_mcp::{McpServer, ScrivenerConfig};
use scrivener_store::FileStore;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Note server speaking MCP over stdio, with automatic tagging.
#[derive(Debug, Parser)]
#[command(name = "scrivener-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "SCRIVENER_CONFIG")]
    config: Option<PathBuf>,

    /// Notes directory (overrides the config file)
    #[arg(long)]
    notes_dir: Option<PathBuf>,

    /// Never consult the inference backend; tag by keywords only
    #[arg(long)]
    no_inference: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = ScrivenerConfig::load(args.config.as_deref());
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialize tracing (log to stderr; stdout carries the protocol)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; using default configuration", e);
            ScrivenerConfig::default()
        }
    };
    if let Some(dir) = args.notes_dir {
        config.storage.notes_dir = Some(dir);
    }
    if args.no_inference {
        config.inference.enabled = false;
    }

    // An unusable notes directory is the only fatal startup error
    let notes_dir = config.notes_dir();
    let (store, report) = FileStore::open(&notes_dir)
        .with_context(|| format!("Failed to open notes directory {}", notes_dir.display()))?;
    info!(
        "Loaded {} notes from {} ({} skipped, {} stale temp files removed)",
        report.loaded,
        notes_dir.display(),
        report.skipped.len(),
        report.removed_temp_files
    );
    for skipped in &report.skipped {
        warn!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }

    let provider = if config.inference.enabled {
        let inference = &config.inference;
        match OllamaProvider::with_timeout(
            &inference.endpoint,
            &inference.model,
            Duration::from_secs(inference.request_timeout_secs),
        ) {
            Ok(provider) => {
                info!("Inference via {} at {}", inference.model, provider.endpoint());
                Some(provider)
            }
            Err(e) => {
                warn!("{}; tagging by keywords only", e);
                None
            }
        }
    } else {
        info!("Inference disabled; tagging by keywords only");
        None
    };

    let engine = ClassificationEngine::new(provider, config.classifier.clone())
        .context("Failed to build classification engine")?;

    let mut server = McpServer::new(store, engine).context("Failed to create MCP server")?;

    // Run server (blocks until stdin closes or the client sends exit)
    server.run().context("MCP server error")?;
    Ok(())
}
