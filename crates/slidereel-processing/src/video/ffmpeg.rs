//! FFmpeg-backed encoder
//!
//! Every image becomes a looped still input. Each one is padded onto the shared
//! canvas, resampled to the output frame rate and trimmed to its duration, then all
//! clips go through the concat filter in upload order.

use super::encoder::{EncodeError, VideoEncoder};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use slidereel_core::{ClipPlan, FrameSize, RenderSettings};
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

const STDERR_TAIL_CHARS: usize = 2000;

/// Validate that a path doesn't contain shell metacharacters
fn validate_binary_path(path: &str) -> Result<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() {
        return Err(anyhow!("Binary path is empty"));
    }
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegEncoder {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Result<Self> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_binary_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    /// Full ffmpeg argument list for one encode.
    pub fn build_args(
        plan: &ClipPlan,
        canvas: FrameSize,
        settings: &RenderSettings,
        output: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y"]
            .iter()
            .map(OsString::from)
            .collect();

        for (source, duration) in plan.sequence() {
            args.extend(
                [
                    "-f".to_string(),
                    "image2".to_string(),
                    "-loop".to_string(),
                    "1".to_string(),
                    "-framerate".to_string(),
                    settings.clip_sample_fps.to_string(),
                    "-t".to_string(),
                    format!("{:.3}", duration),
                    "-i".to_string(),
                ]
                .into_iter()
                .map(OsString::from),
            );
            args.push(source.as_os_str().to_os_string());
        }

        args.push("-filter_complex".into());
        args.push(Self::filter_graph(plan, canvas, settings).into());

        args.extend(
            [
                "-map".to_string(),
                "[outv]".to_string(),
                "-r".to_string(),
                settings.output_fps.to_string(),
                "-c:v".to_string(),
                settings.video_codec.clone(),
                "-pix_fmt".to_string(),
                settings.pixel_format.clone(),
            ]
            .into_iter()
            .map(OsString::from),
        );

        let ext = output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if ext == "mp4" || ext == "mov" {
            args.push("-movflags".into());
            args.push("+faststart".into());
        }

        args.push("-an".into());
        args.push(output.as_os_str().to_os_string());
        args
    }

    fn filter_graph(plan: &ClipPlan, canvas: FrameSize, settings: &RenderSettings) -> String {
        let mut graph = String::new();
        for (i, (_, duration)) in plan.sequence().enumerate() {
            graph.push_str(&format!(
                "[{i}:v]pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1,fps={fps},\
                 trim=duration={d:.3},setpts=PTS-STARTPTS,format={pix}[v{i}];",
                i = i,
                w = canvas.width,
                h = canvas.height,
                fps = settings.output_fps,
                d = duration,
                pix = settings.pixel_format,
            ));
        }
        for i in 0..plan.len() {
            graph.push_str(&format!("[v{}]", i));
        }
        graph.push_str(&format!("concat=n={}:v=1:a=0[outv]", plan.len()));
        graph
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let count = text.chars().count();
    if count <= STDERR_TAIL_CHARS {
        return text.to_string();
    }
    text.chars().skip(count - STDERR_TAIL_CHARS).collect()
}

#[async_trait]
impl VideoEncoder for FfmpegEncoder {
    #[tracing::instrument(skip(self, plan, canvas, settings), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "slideshow",
        clips = plan.len(),
        canvas = %canvas,
    ))]
    async fn encode(
        &self,
        plan: &ClipPlan,
        canvas: FrameSize,
        settings: &RenderSettings,
        output: &Path,
    ) -> Result<(), EncodeError> {
        if plan.is_empty() {
            return Err(EncodeError::Failed("No clips to encode".to_string()));
        }

        let start = Instant::now();
        let args = Self::build_args(plan, canvas, settings, output);

        let child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output_result = match tokio::time::timeout(self.timeout, child).await {
            Ok(result) => result.map_err(|e| EncodeError::Spawn(e.to_string()))?,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "FFmpeg encode timed out, process killed"
                );
                return Err(EncodeError::Timeout {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        if !output_result.status.success() {
            let stderr = stderr_tail(&output_result.stderr);
            tracing::error!(
                status = %output_result.status,
                stderr = %stderr,
                "FFmpeg encode failed"
            );
            return Err(EncodeError::Failed(format!(
                "ffmpeg exited with {}: {}",
                output_result.status, stderr
            )));
        }

        let output_bytes = tokio::fs::metadata(output).await?.len();
        if output_bytes == 0 {
            return Err(EncodeError::Failed("ffmpeg produced an empty file".to_string()));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output_bytes = output_bytes,
            "FFmpeg encode completed"
        );

        Ok(())
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}
