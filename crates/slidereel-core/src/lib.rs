//! Slidereel Core Library
//!
//! This crate provides the configuration, error types and domain models shared by the
//! storage, processing and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, SlideshowConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{Clip, ClipPlan, FrameSize, RenderSettings, UploadedImage};
