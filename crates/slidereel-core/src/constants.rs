//! Shared constants and defaults.

/// Multipart field that carries the uploaded images.
pub const IMAGES_FIELD: &str = "images";

/// Target length of the assembled video when no override is configured.
pub const DEFAULT_TOTAL_DURATION_SECS: f64 = 30.0;

/// Shortest time a single image stays on screen.
pub const DEFAULT_MIN_CLIP_DURATION_SECS: f64 = 1.0;

/// Frame rate of the encoded output.
pub const DEFAULT_OUTPUT_FPS: u32 = 24;

/// Each still image is sampled as a one-frame-per-second clip before re-encoding.
pub const DEFAULT_CLIP_SAMPLE_FPS: u32 = 1;

pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";
pub const DEFAULT_OUTPUT_FILENAME: &str = "output_video.mp4";
pub const DEFAULT_WORK_DIR: &str = "uploads";

/// Prefix of per-request workspace directories under the work root.
pub const WORKSPACE_PREFIX: &str = "job-";
