//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use slidereel_core::Config;
use slidereel_processing::SlideshowPipeline;
use std::sync::Arc;

/// Build the pipeline from configuration, check the host, and assemble the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(&config).context("Configuration validation failed")?;

    let pipeline =
        SlideshowPipeline::from_config(&config).context("Failed to build slideshow pipeline")?;

    initialize_with_pipeline(config, pipeline).await
}

/// Assemble the application around an already built pipeline.
pub async fn initialize_with_pipeline(
    config: Config,
    pipeline: SlideshowPipeline,
) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_environment(&pipeline)
        .await
        .context("Startup checks failed")?;

    tracing::info!("Configuration loaded and validated successfully");

    let state = Arc::new(AppState::new(config.clone(), pipeline));
    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
