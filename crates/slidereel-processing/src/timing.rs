//! Duration policy
//!
//! Every image gets an equal share of the target length, but never less than the
//! configured floor: `max(total / count, min)`. Past `total / min` images the floor
//! wins and the video runs longer than the target.

use slidereel_core::{AppError, Clip, ClipPlan, RenderSettings};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TimingError {
    #[error("No images provided")]
    NoImages,

    #[error("Invalid duration settings: total {total}s, minimum {min}s")]
    InvalidSettings { total: f64, min: f64 },
}

impl From<TimingError> for AppError {
    fn from(err: TimingError) -> Self {
        match err {
            TimingError::NoImages => AppError::InvalidInput(err.to_string()),
            TimingError::InvalidSettings { .. } => AppError::Internal(err.to_string()),
        }
    }
}

/// Seconds each image stays on screen.
pub fn duration_per_image(count: usize, total_secs: f64, min_secs: f64) -> Result<f64, TimingError> {
    if count == 0 {
        return Err(TimingError::NoImages);
    }

    if !(total_secs.is_finite() && min_secs.is_finite()) || total_secs <= 0.0 || min_secs <= 0.0 {
        return Err(TimingError::InvalidSettings {
            total: total_secs,
            min: min_secs,
        });
    }

    Ok((total_secs / count as f64).max(min_secs))
}

/// Build one clip per image, in the order given.
pub fn plan_clips(sources: Vec<PathBuf>, settings: &RenderSettings) -> Result<ClipPlan, TimingError> {
    let duration = duration_per_image(
        sources.len(),
        settings.total_duration_secs,
        settings.min_clip_duration_secs,
    )?;

    let clips = sources
        .into_iter()
        .enumerate()
        .map(|(index, source)| Clip {
            index,
            source,
            duration_secs: duration,
        })
        .collect();

    Ok(ClipPlan {
        clips,
        duration_per_image: duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("{:04}.png", i))).collect()
    }

    #[test]
    fn test_single_image_fills_target() {
        assert_eq!(duration_per_image(1, 30.0, 1.0).unwrap(), 30.0);
    }

    #[test]
    fn test_thirty_images_one_second_each() {
        let plan = plan_clips(paths(30), &RenderSettings::default()).unwrap();
        assert_eq!(plan.duration_per_image, 1.0);
        assert!((plan.total_duration_secs() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_floor_applies_past_thirty_images() {
        let plan = plan_clips(paths(31), &RenderSettings::default()).unwrap();
        assert_eq!(plan.duration_per_image, 1.0);
        assert!((plan.total_duration_secs() - 31.0).abs() < 1e-9);
        assert!(plan.total_duration_secs() > 30.0);
    }

    #[test]
    fn test_uneven_split() {
        let d = duration_per_image(4, 30.0, 1.0).unwrap();
        assert_eq!(d, 7.5);
        let d = duration_per_image(7, 30.0, 1.0).unwrap();
        assert!((d * 7.0 - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_images_is_an_error() {
        assert_eq!(duration_per_image(0, 30.0, 1.0), Err(TimingError::NoImages));
        assert!(plan_clips(Vec::new(), &RenderSettings::default()).is_err());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(duration_per_image(3, 0.0, 1.0).is_err());
        assert!(duration_per_image(3, 30.0, f64::NAN).is_err());
    }

    #[test]
    fn test_plan_preserves_upload_order() {
        let plan = plan_clips(paths(3), &RenderSettings::default()).unwrap();
        let order: Vec<_> = plan.clips.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(plan.clips[2].source, PathBuf::from("0002.png"));
    }

    #[test]
    fn test_custom_total_duration() {
        let settings = RenderSettings {
            total_duration_secs: 60.0,
            ..RenderSettings::default()
        };
        let plan = plan_clips(paths(4), &settings).unwrap();
        assert_eq!(plan.duration_per_image, 15.0);
    }

    #[test]
    fn test_no_images_maps_to_invalid_input() {
        let app: AppError = TimingError::NoImages.into();
        assert!(matches!(app, AppError::InvalidInput(ref m) if m == "No images provided"));
    }
}
