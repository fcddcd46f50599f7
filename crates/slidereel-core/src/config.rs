//! Configuration module
//!
//! This module provides the configuration structures for the HTTP server and the
//! slideshow renderer. Values are read from the environment (and a `.env` file when
//! present); anything unset falls back to the defaults below.

use std::env;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_CLIP_SAMPLE_FPS, DEFAULT_MIN_CLIP_DURATION_SECS, DEFAULT_OUTPUT_FILENAME,
    DEFAULT_OUTPUT_FPS, DEFAULT_PIXEL_FORMAT, DEFAULT_TOTAL_DURATION_SECS, DEFAULT_VIDEO_CODEC,
    DEFAULT_WORK_DIR,
};

// Common constants
const SERVER_PORT: u16 = 5000;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const MAX_IMAGES: usize = 200;
const MAX_FILE_SIZE_MB: usize = 20;
const MAX_REQUEST_SIZE_MB: usize = 512;
const MAX_CONCURRENT_ENCODES: usize = 2;
const ENCODE_TIMEOUT_SECS: u64 = 300;
const MAX_IMAGE_DIMENSION: u32 = 8192;
// 4096 x 4096
const MAX_CANVAS_PIXELS: u64 = 16_777_216;

const DANGEROUS_CHARS: [char; 11] = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
    pub log_format: String,
}

/// Slideshow renderer configuration
#[derive(Clone, Debug)]
pub struct SlideshowConfig {
    pub base: BaseConfig,
    // Workspace configuration
    pub work_dir: String,
    pub keep_workspaces: bool,
    // Upload limits
    pub max_images: usize,
    pub max_file_size_bytes: usize,
    pub max_request_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub max_image_dimension: u32,
    pub max_canvas_pixels: u64,
    // Encoder configuration
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub total_duration_secs: f64,
    pub min_clip_duration_secs: f64,
    pub output_fps: u32,
    pub clip_sample_fps: u32,
    pub video_codec: String,
    pub pixel_format: String,
    pub output_filename: String,
    pub max_concurrent_encodes: usize,
    pub encode_timeout_secs: u64,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            log_format: "compact".to_string(),
        }
    }
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            work_dir: DEFAULT_WORK_DIR.to_string(),
            keep_workspaces: false,
            max_images: MAX_IMAGES,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_request_size_bytes: MAX_REQUEST_SIZE_MB * 1024 * 1024,
            allowed_extensions: split_list("jpg,jpeg,png,gif,webp,bmp"),
            allowed_content_types: split_list(
                "image/jpeg,image/png,image/gif,image/webp,image/bmp",
            ),
            max_image_dimension: MAX_IMAGE_DIMENSION,
            max_canvas_pixels: MAX_CANVAS_PIXELS,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            total_duration_secs: DEFAULT_TOTAL_DURATION_SECS,
            min_clip_duration_secs: DEFAULT_MIN_CLIP_DURATION_SECS,
            output_fps: DEFAULT_OUTPUT_FPS,
            clip_sample_fps: DEFAULT_CLIP_SAMPLE_FPS,
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            pixel_format: DEFAULT_PIXEL_FORMAT.to_string(),
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            max_concurrent_encodes: MAX_CONCURRENT_ENCODES,
            encode_timeout_secs: ENCODE_TIMEOUT_SECS,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config(pub Box<SlideshowConfig>);

impl Config {
    fn inner(&self) -> &SlideshowConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = SlideshowConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env_name(&self.inner().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn work_dir(&self) -> &str {
        &self.inner().work_dir
    }

    pub fn keep_workspaces(&self) -> bool {
        self.inner().keep_workspaces
    }

    pub fn max_images(&self) -> usize {
        self.inner().max_images
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn max_request_size_bytes(&self) -> usize {
        self.inner().max_request_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.inner().allowed_extensions
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.inner().allowed_content_types
    }

    pub fn max_image_dimension(&self) -> u32 {
        self.inner().max_image_dimension
    }

    pub fn max_canvas_pixels(&self) -> u64 {
        self.inner().max_canvas_pixels
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn total_duration_secs(&self) -> f64 {
        self.inner().total_duration_secs
    }

    pub fn min_clip_duration_secs(&self) -> f64 {
        self.inner().min_clip_duration_secs
    }

    pub fn output_fps(&self) -> u32 {
        self.inner().output_fps
    }

    pub fn clip_sample_fps(&self) -> u32 {
        self.inner().clip_sample_fps
    }

    pub fn video_codec(&self) -> &str {
        &self.inner().video_codec
    }

    pub fn pixel_format(&self) -> &str {
        &self.inner().pixel_format
    }

    pub fn output_filename(&self) -> &str {
        &self.inner().output_filename
    }

    pub fn max_concurrent_encodes(&self) -> usize {
        self.inner().max_concurrent_encodes
    }

    pub fn encode_timeout_secs(&self) -> u64 {
        self.inner().encode_timeout_secs
    }
}

fn is_production_env_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse an environment variable, falling back to `default` when unset or unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v.trim().to_lowercase())
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

impl SlideshowConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = SlideshowConfig::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| defaults.base.environment.clone());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            http_concurrency_limit: env_or("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)
                .max(1),
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| defaults.base.log_format.clone())
                .to_lowercase(),
        };

        let config = SlideshowConfig {
            base,
            work_dir: env::var("WORK_DIR").unwrap_or(defaults.work_dir),
            keep_workspaces: env_flag("KEEP_WORKSPACES", false),
            max_images: env_or("MAX_IMAGES", MAX_IMAGES),
            max_file_size_bytes: env_or("MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB) * 1024 * 1024,
            max_request_size_bytes: env_or("MAX_REQUEST_SIZE_MB", MAX_REQUEST_SIZE_MB)
                * 1024
                * 1024,
            allowed_extensions: env::var("ALLOWED_EXTENSIONS")
                .map(|s| split_list(&s))
                .unwrap_or(defaults.allowed_extensions),
            allowed_content_types: env::var("ALLOWED_CONTENT_TYPES")
                .map(|s| split_list(&s))
                .unwrap_or(defaults.allowed_content_types),
            max_image_dimension: env_or("MAX_IMAGE_DIMENSION", MAX_IMAGE_DIMENSION),
            max_canvas_pixels: env_or("MAX_CANVAS_PIXELS", MAX_CANVAS_PIXELS),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or(defaults.ffmpeg_path),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or(defaults.ffprobe_path),
            total_duration_secs: env_or("TOTAL_DURATION_SECS", DEFAULT_TOTAL_DURATION_SECS),
            min_clip_duration_secs: env_or(
                "MIN_CLIP_DURATION_SECS",
                DEFAULT_MIN_CLIP_DURATION_SECS,
            ),
            output_fps: env_or("OUTPUT_FPS", DEFAULT_OUTPUT_FPS),
            clip_sample_fps: env_or("CLIP_SAMPLE_FPS", DEFAULT_CLIP_SAMPLE_FPS),
            video_codec: env::var("VIDEO_CODEC").unwrap_or(defaults.video_codec),
            pixel_format: env::var("PIXEL_FORMAT").unwrap_or(defaults.pixel_format),
            output_filename: env::var("OUTPUT_FILENAME").unwrap_or(defaults.output_filename),
            max_concurrent_encodes: env_or("MAX_CONCURRENT_ENCODES", MAX_CONCURRENT_ENCODES),
            encode_timeout_secs: env_or("ENCODE_TIMEOUT_SECS", ENCODE_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if is_production_env_name(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !self.total_duration_secs.is_finite() || self.total_duration_secs <= 0.0 {
            return Err(anyhow::anyhow!("TOTAL_DURATION_SECS must be greater than 0"));
        }

        if !self.min_clip_duration_secs.is_finite() || self.min_clip_duration_secs <= 0.0 {
            return Err(anyhow::anyhow!(
                "MIN_CLIP_DURATION_SECS must be greater than 0"
            ));
        }

        if self.min_clip_duration_secs > self.total_duration_secs {
            return Err(anyhow::anyhow!(
                "MIN_CLIP_DURATION_SECS cannot exceed TOTAL_DURATION_SECS"
            ));
        }

        if self.output_fps == 0 || self.clip_sample_fps == 0 {
            return Err(anyhow::anyhow!(
                "OUTPUT_FPS and CLIP_SAMPLE_FPS must be greater than 0"
            ));
        }

        if self.max_images == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGES must be greater than 0"));
        }

        if self.max_concurrent_encodes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_ENCODES must be greater than 0"
            ));
        }

        if self.max_image_dimension == 0 || self.max_canvas_pixels == 0 {
            return Err(anyhow::anyhow!(
                "MAX_IMAGE_DIMENSION and MAX_CANVAS_PIXELS must be greater than 0"
            ));
        }

        if self.encode_timeout_secs == 0 {
            return Err(anyhow::anyhow!("ENCODE_TIMEOUT_SECS must be greater than 0"));
        }

        for (name, value) in [
            ("FFMPEG_PATH", &self.ffmpeg_path),
            ("FFPROBE_PATH", &self.ffprobe_path),
            ("VIDEO_CODEC", &self.video_codec),
            ("PIXEL_FORMAT", &self.pixel_format),
        ] {
            if value.is_empty() || value.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
                return Err(anyhow::anyhow!(
                    "{} is empty or contains dangerous characters",
                    name
                ));
            }
        }

        let filename_ok = !self.output_filename.is_empty()
            && self
                .output_filename
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
            && !self.output_filename.starts_with('.');
        if !filename_ok {
            return Err(anyhow::anyhow!(
                "OUTPUT_FILENAME may only contain ASCII letters, digits, '.', '-' and '_'"
            ));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS cannot be empty"));
        }

        Ok(())
    }
}
