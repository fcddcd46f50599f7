use serde::{Deserialize, Serialize};

/// Properties of an encoded video as reported by ffprobe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub codec: String,
    pub bitrate: Option<u64>,
    pub framerate: Option<f64>,
}

impl VideoMetadata {
    /// Differences between the probed video and what was requested.
    ///
    /// Each clip is cut on an output frame boundary, so the total may drift by up to
    /// one frame per clip. A missing framerate is reported.
    pub fn mismatches(
        &self,
        expected_fps: u32,
        expected_duration: f64,
        clips: usize,
    ) -> Vec<String> {
        let mut issues = Vec::new();

        match self.framerate {
            Some(fps) if (fps - f64::from(expected_fps)).abs() < 0.01 => {}
            Some(fps) => issues.push(format!(
                "framerate {:.3} does not match {}",
                fps, expected_fps
            )),
            None => issues.push("framerate missing from probe".to_string()),
        }

        let frame = 1.0 / f64::from(expected_fps.max(1));
        let tolerance = frame * clips.max(1) as f64 + 1e-3;
        if (self.duration - expected_duration).abs() > tolerance {
            issues.push(format!(
                "duration {:.3}s differs from planned {:.3}s",
                self.duration, expected_duration
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(duration: f64, framerate: Option<f64>) -> VideoMetadata {
        VideoMetadata {
            duration,
            width: 640,
            height: 480,
            codec: "h264".to_string(),
            bitrate: None,
            framerate,
        }
    }

    #[test]
    fn test_matching_output_has_no_mismatches() {
        assert!(meta(30.0, Some(24.0)).mismatches(24, 30.0, 1).is_empty());
        assert!(meta(30.04, Some(24.0)).mismatches(24, 30.0, 1).is_empty());
        assert!(meta(30.2, Some(24.0)).mismatches(24, 30.0, 7).is_empty());
    }

    #[test]
    fn test_wrong_framerate_reported() {
        let issues = meta(30.0, Some(25.0)).mismatches(24, 30.0, 1);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("framerate"));

        assert_eq!(meta(30.0, None).mismatches(24, 30.0, 1).len(), 1);
    }

    #[test]
    fn test_duration_drift_beyond_one_frame_reported() {
        let issues = meta(29.5, Some(24.0)).mismatches(24, 30.0, 3);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("duration"));
    }
}
