use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod config;
mod dashboard;
mod derived;
mod features;
mod prediction;
mod scoring;
mod teams;

use config::Config;
use dashboard::AppState;
use prediction::PredictionService;
use scoring::{ForestModel, RemoteScorer, Scorer};
use teams::TeamDirectory;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // The scorer is loaded before the server starts; a missing or
    // incompatible artifact aborts here.
    let scorer = build_scorer(&config)?;
    info!("Team directory: {} codes", TeamDirectory::global().len());

    let state = AppState::new(PredictionService::new(scorer));
    let app = dashboard::router(state, config.assets_dir.as_deref());
    if let Some(dir) = &config.assets_dir {
        info!("Serving assets from {}", dir);
    }

    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Salary predictor listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_scorer(config: &Config) -> Result<Arc<dyn Scorer>> {
    if let Some(url) = &config.scorer_url {
        info!("Using remote scoring service at {}", url);
        return Ok(Arc::new(RemoteScorer::new(url)?));
    }

    let model = ForestModel::from_file(&config.model_path)
        .with_context(|| format!("Failed to load model artifact '{}'", config.model_path))?;
    info!(
        "Model loaded: {} trees, {} team categories, input dim {}",
        model.trees.len(),
        model.team_categories.len(),
        model.input_dim()
    );
    Ok(Arc::new(model))
}
