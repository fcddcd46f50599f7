use slidereel_core::Config;
use slidereel_processing::SlideshowPipeline;
use std::time::Instant;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub pipeline: SlideshowPipeline,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, pipeline: SlideshowPipeline) -> Self {
        Self {
            config,
            pipeline,
            started_at: Instant::now(),
        }
    }
}
