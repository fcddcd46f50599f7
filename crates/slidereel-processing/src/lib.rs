//! Slidereel Media Processing Library
//!
//! Turns a sequence of uploaded images into a video: validation, duration planning,
//! compositing canvas, and the encoder that does the actual work (FFmpeg).

pub mod canvas;
pub mod metadata;
pub mod pipeline;
pub mod timing;
pub mod validator;
pub mod video;

// Re-export commonly used types
pub use canvas::{compose_canvas, image_dimensions};
pub use metadata::VideoMetadata;
pub use pipeline::{SlideshowPipeline, VideoOutput};
pub use timing::{duration_per_image, plan_clips, TimingError};
pub use validator::{MediaValidator, ValidatedImage, ValidationError};
pub use video::{EncodeError, FfmpegEncoder, VideoEncoder, VideoProbe};
