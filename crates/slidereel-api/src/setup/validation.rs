//! Startup validation
//!
//! Catches misconfiguration before the server accepts its first upload.

use anyhow::{anyhow, Result};
use slidereel_core::Config;
use slidereel_processing::SlideshowPipeline;

/// Validate configuration values that cannot be checked while parsing.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();
    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();
    if is_production && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    if config.max_request_size_bytes() < config.max_file_size_bytes() {
        return Err(anyhow!(
            "MAX_REQUEST_SIZE_MB ({}) is smaller than MAX_FILE_SIZE_MB ({})",
            config.max_request_size_bytes() / 1024 / 1024,
            config.max_file_size_bytes() / 1024 / 1024
        ));
    }

    if config.keep_workspaces() {
        tracing::warn!(
            work_dir = %config.work_dir(),
            "KEEP_WORKSPACES is enabled - uploaded images will accumulate on disk"
        );
    }

    Ok(())
}

/// Check the host: the work root must be writable, the encoder should be runnable.
pub async fn validate_environment(pipeline: &SlideshowPipeline) -> Result<()> {
    let work_dir = pipeline.provider().root().display().to_string();
    pipeline.provider().ensure_root().await.map_err(|e| {
        anyhow!("Work directory {} is not usable: {}", work_dir, e)
    })?;

    if pipeline.encoder_available().await {
        tracing::info!(encoder = pipeline.encoder_name(), "Encoder available");
    } else {
        // The server still starts so /health can report the problem.
        tracing::error!(
            encoder = pipeline.encoder_name(),
            "Encoder is not runnable - video creation will fail until it is installed"
        );
    }

    Ok(())
}
