use async_trait::async_trait;
use slidereel_core::{AppError, ClipPlan, FrameSize, RenderSettings};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Encoder failed: {0}")]
    Failed(String),

    #[error("Encoder did not finish within {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Failed to start encoder: {0}")]
    Spawn(String),

    #[error("Encoder IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EncodeError> for AppError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::Timeout { seconds } => AppError::Timeout { seconds },
            EncodeError::Failed(msg) => AppError::MediaConversionError(msg),
            EncodeError::Spawn(msg) => AppError::Internal(format!("Encoder unavailable: {}", msg)),
            EncodeError::Io(err) => AppError::Internal(format!("IO error: {}", err)),
        }
    }
}

/// Renders a clip plan to a video file.
#[async_trait]
pub trait VideoEncoder: Send + Sync {
    /// Encode `plan` onto a `canvas`-sized frame and write the video to `output`.
    async fn encode(
        &self,
        plan: &ClipPlan,
        canvas: FrameSize,
        settings: &RenderSettings,
        output: &Path,
    ) -> Result<(), EncodeError>;

    /// Name for logs
    fn name(&self) -> &str;

    /// Whether the encoder can run on this host
    async fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidereel_core::ErrorMetadata;

    #[test]
    fn test_timeout_maps_to_504() {
        let app: AppError = EncodeError::Timeout { seconds: 12 }.into();
        assert_eq!(app.http_status_code(), 504);
    }

    #[test]
    fn test_failure_is_sensitive_conversion_error() {
        let app: AppError = EncodeError::Failed("Invalid data found".to_string()).into();
        assert_eq!(app.error_code(), "MEDIA_CONVERSION_ERROR");
        assert!(app.is_sensitive());
    }
}
