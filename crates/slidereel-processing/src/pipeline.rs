//! Slideshow pipeline
//!
//! Validate every upload, persist the images into a fresh workspace, plan the clips,
//! then hand the plan to the encoder. The workspace lives exactly as long as one
//! call to [`SlideshowPipeline::render`].

use crate::canvas::compose_canvas;
use crate::metadata::VideoMetadata;
use crate::timing::plan_clips;
use crate::validator::MediaValidator;
use crate::video::{FfmpegEncoder, VideoEncoder, VideoProbe};
use bytes::Bytes;
use slidereel_core::{AppError, Config, FrameSize, RenderSettings, UploadedImage};
use slidereel_storage::{StorageError, WorkspaceProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// An encoded video ready to send to the client.
#[derive(Debug, Clone)]
pub struct VideoOutput {
    pub data: Bytes,
    pub filename: String,
    pub content_type: &'static str,
    pub image_count: usize,
    pub duration_per_image: f64,
    pub duration_secs: f64,
    pub canvas: FrameSize,
    pub metadata: Option<VideoMetadata>,
}

#[derive(Clone)]
pub struct SlideshowPipeline {
    provider: WorkspaceProvider,
    validator: MediaValidator,
    encoder: Arc<dyn VideoEncoder>,
    probe: Option<VideoProbe>,
    settings: RenderSettings,
    max_images: usize,
    encode_slots: Arc<Semaphore>,
    queue_timeout: Duration,
    max_canvas_pixels: u64,
}

impl SlideshowPipeline {
    pub fn new(
        provider: WorkspaceProvider,
        validator: MediaValidator,
        encoder: Arc<dyn VideoEncoder>,
        settings: RenderSettings,
        max_images: usize,
        max_concurrent_encodes: usize,
        queue_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            validator,
            encoder,
            probe: None,
            settings,
            max_images,
            encode_slots: Arc::new(Semaphore::new(max_concurrent_encodes.max(1))),
            queue_timeout,
            max_canvas_pixels: u64::MAX,
        }
    }

    /// Build the production pipeline: local workspaces, ffmpeg encoder, ffprobe readback.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.encode_timeout_secs());
        let encoder = FfmpegEncoder::new(config.ffmpeg_path(), timeout)?;
        let probe = VideoProbe::new(config.ffprobe_path())?;

        Ok(Self::new(
            WorkspaceProvider::new(config.work_dir(), config.keep_workspaces()),
            MediaValidator::new(
                config.max_file_size_bytes(),
                config.allowed_extensions().to_vec(),
                config.allowed_content_types().to_vec(),
            )
            .with_max_dimension(config.max_image_dimension()),
            Arc::new(encoder),
            RenderSettings::from(config),
            config.max_images(),
            config.max_concurrent_encodes(),
            timeout,
        )
        .with_probe(probe)
        .with_max_canvas_pixels(config.max_canvas_pixels()))
    }

    pub fn with_probe(mut self, probe: VideoProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Upper bound on `width * height` of the composed canvas.
    pub fn with_max_canvas_pixels(mut self, max_canvas_pixels: u64) -> Self {
        self.max_canvas_pixels = max_canvas_pixels;
        self
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn provider(&self) -> &WorkspaceProvider {
        &self.provider
    }

    pub fn encoder_name(&self) -> &str {
        self.encoder.name()
    }

    pub async fn encoder_available(&self) -> bool {
        self.encoder.is_available().await
    }

    /// Encode slots not currently in use.
    pub fn available_encode_slots(&self) -> usize {
        self.encode_slots.available_permits()
    }

    /// Turn uploaded images into one video, in upload order.
    #[tracing::instrument(skip(self, images), fields(image_count = images.len()))]
    pub async fn render(&self, images: Vec<UploadedImage>) -> Result<VideoOutput, AppError> {
        let start = Instant::now();

        if images.is_empty() {
            return Err(AppError::InvalidInput("No images provided".to_string()));
        }
        if images.len() > self.max_images {
            return Err(AppError::TooManyImages {
                count: images.len(),
                max: self.max_images,
            });
        }

        let mut validated = Vec::with_capacity(images.len());
        for image in &images {
            let result = self
                .validator
                .validate_all(&image.original_filename, &image.content_type, &image.data)
                .map_err(|e| {
                    tracing::debug!(
                        index = image.index,
                        filename = %image.original_filename,
                        error = %e,
                        "Image rejected"
                    );
                    AppError::from(e)
                })?;
            validated.push(result);
        }

        let sizes: Vec<FrameSize> = validated.iter().map(|v| v.dimensions).collect();
        let canvas = compose_canvas(&sizes)
            .ok_or_else(|| AppError::InvalidInput("No images provided".to_string()))?;
        if canvas.pixels() > self.max_canvas_pixels {
            tracing::debug!(
                canvas = %canvas,
                max_pixels = self.max_canvas_pixels,
                "Canvas rejected"
            );
            return Err(AppError::ImageProcessing(format!(
                "Combined canvas {} has {} pixels, at most {} allowed",
                canvas,
                canvas.pixels(),
                self.max_canvas_pixels
            )));
        }

        let workspace = self.provider.create().await?;

        let mut sources = Vec::with_capacity(images.len());
        for (position, (image, check)) in images.iter().zip(&validated).enumerate() {
            let stored = workspace
                .store_image(position, check.extension, &image.data)
                .await?;
            sources.push(stored.path);
        }

        let plan = plan_clips(sources, &self.settings)?;

        tracing::info!(
            workspace_id = %workspace.id(),
            clips = plan.len(),
            duration_per_image = plan.duration_per_image,
            canvas = %canvas,
            "Clip plan ready"
        );

        let _permit = match tokio::time::timeout(
            self.queue_timeout,
            self.encode_slots.clone().acquire_owned(),
        )
        .await
        {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(AppError::Internal("Encoder pool closed".to_string())),
            Err(_) => {
                tracing::warn!(
                    waited_secs = self.queue_timeout.as_secs(),
                    "No encode slot became free"
                );
                return Err(AppError::EncoderBusy(
                    "All encoders are busy, try again shortly".to_string(),
                ));
            }
        };

        let output_path = workspace.output_path(&self.settings.output_filename)?;
        self.encoder
            .encode(&plan, canvas, &self.settings, &output_path)
            .await?;
        let data = match workspace.read(&self.settings.output_filename).await {
            Ok(data) => Bytes::from(data),
            Err(StorageError::NotFound(_)) => {
                return Err(AppError::MediaConversionError(
                    "Encoder reported success but wrote no output".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = match &self.probe {
            Some(probe) => match probe.probe(&output_path).await {
                Ok(meta) => {
                    let issues = meta.mismatches(
                        self.settings.output_fps,
                        plan.total_duration_secs(),
                        plan.len(),
                    );
                    if !issues.is_empty() {
                        tracing::warn!(
                            issues = ?issues,
                            probed_fps = ?meta.framerate,
                            probed_duration = meta.duration,
                            "Encoded video differs from the clip plan"
                        );
                    }
                    Some(meta)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Could not probe encoded video");
                    None
                }
            },
            None => None,
        };

        tracing::info!(
            workspace_id = %workspace.id(),
            encoder = self.encoder.name(),
            output_bytes = data.len(),
            duration_ms = start.elapsed().as_millis(),
            "Slideshow rendered"
        );

        Ok(VideoOutput {
            data,
            filename: self.settings.output_filename.clone(),
            content_type: self.settings.content_type(),
            image_count: plan.len(),
            duration_per_image: plan.duration_per_image,
            duration_secs: plan.total_duration_secs(),
            canvas,
            metadata,
        })
    }
}
