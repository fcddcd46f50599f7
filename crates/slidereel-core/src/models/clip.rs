use std::path::PathBuf;

/// One still image held on screen for `duration_secs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub index: usize,
    pub source: PathBuf,
    pub duration_secs: f64,
}

/// Ordered clips making up one video, in upload order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPlan {
    pub clips: Vec<Clip>,
    pub duration_per_image: f64,
}

impl ClipPlan {
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Sum of all clip durations in seconds.
    pub fn total_duration_secs(&self) -> f64 {
        self.clips.iter().map(|c| c.duration_secs).sum()
    }

    /// `(image, duration)` pairs, the shape encoders consume.
    pub fn sequence(&self) -> impl Iterator<Item = (&std::path::Path, f64)> {
        self.clips
            .iter()
            .map(|c| (c.source.as_path(), c.duration_secs))
    }
}
