//! `recipe-analyzer` server binary.
//!
//! Loads configuration from file, environment and flags, then serves the
//! analyzer API until Ctrl-C.

mod config;
mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use runtime::RecipeAnalyzer;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "recipe-analyzer.toml";

#[derive(Parser)]
#[command(name = "recipe-analyzer")]
#[command(about = "Generate recipes with nutritional analysis from ingredients", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ./recipe-analyzer.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Verbose logging
    #[arg(long)]
    debug: bool,

    /// Start generation with the tool-using agent
    #[arg(long)]
    agentic: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(config.server.debug);

    let provider = config.provider()?;
    tracing::info!(
        provider = %provider,
        agentic = config.engine.agentic,
        max_iterations = config.engine.max_iterations,
        cache = config.engine.cache,
        "initializing recipe analyzer"
    );

    let analyzer = Arc::new(RecipeAnalyzer::new(provider, config.engine.clone()));
    let app = server::router(analyzer, &config.server.allowed_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// File, then environment, then flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None if Path::new(CONFIG_FILE).exists() => Config::load(CONFIG_FILE)?,
        None => Config::default(),
    };
    config.apply_env()?;

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.debug {
        config.server.debug = true;
    }
    if cli.agentic {
        config.engine.agentic = true;
    }
    Ok(config)
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received, draining connections");
}
