//! Video encoding
//!
//! The encoder turns a [`slidereel_core::ClipPlan`] into a single video file.
//! [`FfmpegEncoder`] drives an external ffmpeg binary; [`VideoProbe`] reads the
//! result back with ffprobe.

mod encoder;
mod ffmpeg;
mod probe;

pub use encoder::{EncodeError, VideoEncoder};
pub use ffmpeg::FfmpegEncoder;
pub use probe::{parse_probe_output, VideoProbe};
