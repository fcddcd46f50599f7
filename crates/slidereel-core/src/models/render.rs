use crate::config::Config;

/// Encoder settings derived from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub total_duration_secs: f64,
    pub min_clip_duration_secs: f64,
    pub output_fps: u32,
    pub clip_sample_fps: u32,
    pub video_codec: String,
    pub pixel_format: String,
    pub output_filename: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings::from(&Config::default())
    }
}

impl From<&Config> for RenderSettings {
    fn from(config: &Config) -> Self {
        Self {
            total_duration_secs: config.total_duration_secs(),
            min_clip_duration_secs: config.min_clip_duration_secs(),
            output_fps: config.output_fps(),
            clip_sample_fps: config.clip_sample_fps(),
            video_codec: config.video_codec().to_string(),
            pixel_format: config.pixel_format().to_string(),
            output_filename: config.output_filename().to_string(),
        }
    }
}

impl RenderSettings {
    /// MIME type of the encoded container, derived from the output filename.
    pub fn content_type(&self) -> &'static str {
        let ext = self
            .output_filename
            .rsplit('.')
            .next()
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "webm" => "video/webm",
            "mkv" => "video/x-matroska",
            "mov" => "video/quicktime",
            "avi" => "video/x-msvideo",
            _ => "video/mp4",
        }
    }
}
