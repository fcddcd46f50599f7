//! Test helpers: build the application around a fake encoder.
//!
//! Run from workspace root: `cargo test -p slidereel-api`.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use slidereel_api::setup;
use slidereel_core::{ClipPlan, Config, FrameSize, RenderSettings, SlideshowConfig};
use slidereel_processing::{EncodeError, MediaValidator, SlideshowPipeline, VideoEncoder};
use slidereel_storage::WorkspaceProvider;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Bytes the fake encoder "produces".
pub const FAKE_VIDEO: &[u8] = b"\x00\x00\x00\x18ftypmp42fake-video";

/// One call to the fake encoder.
#[derive(Debug, Clone)]
pub struct EncodeCall {
    pub sources: Vec<PathBuf>,
    pub durations: Vec<f64>,
    pub canvas: FrameSize,
    pub output: PathBuf,
}

/// Encoder double that records its input instead of running ffmpeg.
#[derive(Default)]
pub struct FakeEncoder {
    pub calls: Mutex<Vec<EncodeCall>>,
    pub fail: bool,
    pub unavailable: bool,
}

impl FakeEncoder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<EncodeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoEncoder for FakeEncoder {
    async fn encode(
        &self,
        plan: &ClipPlan,
        canvas: FrameSize,
        _settings: &RenderSettings,
        output: &Path,
    ) -> Result<(), EncodeError> {
        for clip in &plan.clips {
            assert!(clip.source.exists(), "clip source missing: {:?}", clip.source);
        }
        self.calls.lock().unwrap().push(EncodeCall {
            sources: plan.clips.iter().map(|c| c.source.clone()).collect(),
            durations: plan.clips.iter().map(|c| c.duration_secs).collect(),
            canvas,
            output: output.to_path_buf(),
        });

        if self.fail {
            return Err(EncodeError::Failed(
                "ffmpeg exited with 1: /secret/path/job-x/0000.png: Invalid data".to_string(),
            ));
        }

        tokio::fs::write(output, FAKE_VIDEO).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }

    async fn is_available(&self) -> bool {
        !self.unavailable
    }
}

/// Test application: server, encoder double, and the work root.
pub struct TestApp {
    pub server: TestServer,
    pub encoder: Arc<FakeEncoder>,
    pub work_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Entries left under the work root (workspaces that were not cleaned up).
    pub fn leftover_workspaces(&self) -> usize {
        std::fs::read_dir(self.work_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}, FakeEncoder::default()).await
}

/// Setup test app with an isolated work root and a customised config.
pub async fn setup_test_app_with(
    customize: impl FnOnce(&mut SlideshowConfig),
    encoder: FakeEncoder,
) -> TestApp {
    let work_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let mut inner = SlideshowConfig {
        work_dir: work_dir.path().to_string_lossy().into_owned(),
        ..SlideshowConfig::default()
    };
    customize(&mut inner);
    let config = Config(Box::new(inner));

    let encoder = Arc::new(encoder);
    let pipeline = SlideshowPipeline::new(
        WorkspaceProvider::new(config.work_dir(), config.keep_workspaces()),
        MediaValidator::new(
            config.max_file_size_bytes(),
            config.allowed_extensions().to_vec(),
            config.allowed_content_types().to_vec(),
        )
        .with_max_dimension(config.max_image_dimension()),
        encoder.clone(),
        RenderSettings::from(&config),
        config.max_images(),
        config.max_concurrent_encodes(),
        Duration::from_secs(config.encode_timeout_secs()),
    )
    .with_max_canvas_pixels(config.max_canvas_pixels());

    let (_state, app) = setup::initialize_with_pipeline(config, pipeline)
        .await
        .expect("Failed to initialize app");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        encoder,
        work_dir,
    }
}
