use ::image::ImageFormat;
use slidereel_core::{AppError, FrameSize};
use std::path::Path;

use crate::canvas::image_dimensions;

/// Validation errors for uploaded images
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File content is not a supported image")]
    UnrecognizedImage,

    #[error("Image could not be decoded: {0}")]
    Undecodable(String),

    #[error("Image is {width}x{height}, sides may be at most {max} pixels")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            ValidationError::InvalidExtension { .. }
            | ValidationError::InvalidContentType { .. }
            | ValidationError::UnrecognizedImage => AppError::UnsupportedMediaType(err.to_string()),
            ValidationError::Undecodable(_) | ValidationError::DimensionsTooLarge { .. } => {
                AppError::ImageProcessing(err.to_string())
            }
            ValidationError::EmptyFile => AppError::InvalidInput(err.to_string()),
        }
    }
}

/// What the validator learned about an accepted image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedImage {
    pub format: ImageFormat,
    /// Extension used when storing the file, derived from the content.
    pub extension: &'static str,
    pub dimensions: FrameSize,
}

/// Upload validator
///
/// Checks size, declared extension and content type, then sniffs the bytes. The
/// sniffed format is authoritative; client metadata can only narrow what is accepted.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
    max_dimension: u32,
}

impl MediaValidator {
    pub fn new(
        max_file_size: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|c| c.to_lowercase())
                .collect(),
            max_dimension: u32::MAX,
        }
    }

    /// Reject images whose width or height exceeds `max_dimension`.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate image dimensions
    pub fn validate_dimensions(&self, size: FrameSize) -> Result<(), ValidationError> {
        if size.width > self.max_dimension || size.height > self.max_dimension {
            return Err(ValidationError::DimensionsTooLarge {
                width: size.width,
                height: size.height,
                max: self.max_dimension,
            });
        }

        Ok(())
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate the extension of the client filename. Filenames without one pass.
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let Some(extension) = extension_of(filename) else {
            return Ok(());
        };

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    /// Validate the declared content type. Missing or generic types pass.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = normalize_content_type(content_type);
        if is_generic_content_type(&normalized) {
            return Ok(());
        }

        if !self.allowed_content_types.contains(&normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate that Content-Type matches the file extension
    pub fn validate_extension_content_type_match(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        let Some(extension) = extension_of(filename) else {
            return Ok(());
        };
        let normalized = normalize_content_type(content_type);
        if is_generic_content_type(&normalized) {
            return Ok(());
        }

        let expected: &[&str] = match extension.as_str() {
            "jpg" | "jpeg" => &["image/jpeg", "image/jpg", "image/pjpeg"],
            "png" => &["image/png"],
            "gif" => &["image/gif"],
            "webp" => &["image/webp"],
            "bmp" => &["image/bmp", "image/x-bmp", "image/x-ms-bmp"],
            _ => {
                tracing::debug!(
                    extension = %extension,
                    content_type = %content_type,
                    "Unknown extension, skipping Content-Type/extension cross-validation"
                );
                return Ok(());
            }
        };

        if !expected.contains(&normalized.as_str()) {
            return Err(ValidationError::InvalidContentType {
                content_type: format!(
                    "{} (does not match extension '{}'. Expected one of: {})",
                    content_type,
                    extension,
                    expected.join(", ")
                ),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Sniff the image format from magic bytes.
    pub fn detect_format(&self, data: &[u8]) -> Result<(ImageFormat, &'static str), ValidationError> {
        let format = ::image::guess_format(data).map_err(|_| ValidationError::UnrecognizedImage)?;
        let extension = stored_extension(format).ok_or(ValidationError::UnrecognizedImage)?;

        let allowed = self
            .allowed_extensions
            .iter()
            .any(|e| e == extension || (extension == "jpg" && e == "jpeg"));
        if !allowed {
            return Err(ValidationError::InvalidExtension {
                extension: extension.to_string(),
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok((format, extension))
    }

    /// Run every check and read the image header.
    pub fn validate_all(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<ValidatedImage, ValidationError> {
        self.validate_file_size(data.len())?;
        self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        self.validate_extension_content_type_match(filename, content_type)?;

        let (format, extension) = self.detect_format(data)?;
        let dimensions =
            image_dimensions(data).map_err(|e| ValidationError::Undecodable(format!("{:#}", e)))?;
        self.validate_dimensions(dimensions)?;

        Ok(ValidatedImage {
            format,
            extension,
            dimensions,
        })
    }
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Lowercase and strip parameters such as `; charset=binary`.
fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

fn is_generic_content_type(normalized: &str) -> bool {
    normalized.is_empty() || normalized == "application/octet-stream"
}

fn stored_extension(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("png"),
        ImageFormat::Jpeg => Some("jpg"),
        ImageFormat::Gif => Some("gif"),
        ImageFormat::WebP => Some("webp"),
        ImageFormat::Bmp => Some("bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::RgbImage;
    use slidereel_core::ErrorMetadata;
    use std::io::Cursor;

    fn test_validator() -> MediaValidator {
        MediaValidator::new(
            1024 * 1024, // 1MB
            vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            vec!["image/jpeg".to_string(), "image/png".to_string()],
        )
    }

    fn encoded(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_validate_file_size() {
        let validator = test_validator();
        assert!(validator.validate_file_size(512 * 1024).is_ok());
        assert!(matches!(
            validator.validate_file_size(2 * 1024 * 1024),
            Err(ValidationError::FileTooLarge { .. })
        ));
        assert!(matches!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_validate_extension() {
        let validator = test_validator();
        assert!(validator.validate_extension("holiday.JPG").is_ok());
        assert!(validator.validate_extension("no_extension").is_ok());
        assert!(validator.validate_extension("notes.txt").is_err());
    }

    #[test]
    fn test_validate_content_type() {
        let validator = test_validator();
        assert!(validator.validate_content_type("IMAGE/PNG").is_ok());
        assert!(validator.validate_content_type("image/png; charset=binary").is_ok());
        assert!(validator.validate_content_type("application/octet-stream").is_ok());
        assert!(validator.validate_content_type("").is_ok());
        assert!(validator.validate_content_type("text/html").is_err());
    }

    #[test]
    fn test_extension_content_type_mismatch() {
        let validator = test_validator();
        assert!(validator
            .validate_extension_content_type_match("a.jpg", "image/jpeg")
            .is_ok());
        assert!(validator
            .validate_extension_content_type_match("a.jpg", "image/png")
            .is_err());
        assert!(validator
            .validate_extension_content_type_match("a.jpg", "application/octet-stream")
            .is_ok());
    }

    #[test]
    fn test_validate_all_png() {
        let validator = test_validator();
        let data = encoded(ImageFormat::Png, 8, 6);
        let validated = validator.validate_all("a.png", "image/png", &data).unwrap();
        assert_eq!(validated.format, ImageFormat::Png);
        assert_eq!(validated.extension, "png");
        assert_eq!(validated.dimensions, FrameSize::new(8, 6));
    }

    #[test]
    fn test_sniffed_format_wins_over_filename() {
        let validator = test_validator();
        let data = encoded(ImageFormat::Jpeg, 4, 4);
        let validated = validator
            .validate_all("upload", "application/octet-stream", &data)
            .unwrap();
        assert_eq!(validated.extension, "jpg");
    }

    #[test]
    fn test_non_image_content_rejected() {
        let validator = test_validator();
        let err = validator
            .validate_all("evil.png", "image/png", b"#!/bin/sh\nrm -rf /\n")
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnrecognizedImage));
        let app: AppError = err.into();
        assert_eq!(app.http_status_code(), 415);
    }

    #[test]
    fn test_disallowed_sniffed_format_rejected() {
        let validator = test_validator();
        let data = encoded(ImageFormat::Bmp, 2, 2);
        assert!(matches!(
            validator.validate_all("x", "", &data),
            Err(ValidationError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_truncated_image_is_processing_error() {
        let validator = test_validator();
        let data = encoded(ImageFormat::Png, 8, 8);
        let err = validator.validate_all("a.png", "image/png", &data[..12]).unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.error_code(), "IMAGE_PROCESSING_ERROR");
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let validator = test_validator().with_max_dimension(64);
        let tall = encoded(ImageFormat::Png, 1, 65);
        let err = validator.validate_all("tall.png", "image/png", &tall).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::DimensionsTooLarge { width: 1, height: 65, max: 64 }
        ));
        let app: AppError = err.into();
        assert_eq!(app.http_status_code(), 400);

        let edge = encoded(ImageFormat::Png, 64, 64);
        assert!(validator.validate_all("edge.png", "image/png", &edge).is_ok());
    }

    #[test]
    fn test_too_large_maps_to_413() {
        let app: AppError = ValidationError::FileTooLarge { size: 10, max: 1 }.into();
        assert_eq!(app.http_status_code(), 413);
    }
}
