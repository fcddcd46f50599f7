//! Multipart upload extraction

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use slidereel_core::constants::IMAGES_FIELD;
use slidereel_core::{AppError, UploadedImage};

const MAX_FILENAME_LENGTH: usize = 255;

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Request body too large: {}", e.body_text()))
    } else {
        AppError::BadRequest(format!("Failed to read multipart: {}", e.body_text()))
    }
}

/// Collect every file sent in the `images` field, in the order received.
///
/// Other fields are ignored. Parts with neither a filename nor content (what a
/// browser sends when no file was picked) are skipped. Files are read in chunks so
/// an oversized one is rejected without buffering it whole.
pub async fn extract_images(
    mut multipart: Multipart,
    max_images: usize,
    max_file_size: usize,
) -> Result<Vec<UploadedImage>, AppError> {
    let mut images = Vec::new();
    let mut seen = 0usize;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != IMAGES_FIELD {
            tracing::debug!(field = %field_name, "Ignoring unexpected multipart field");
            continue;
        }

        let filename = sanitize_filename(field.file_name().unwrap_or_default());
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());

        seen += 1;
        if seen > max_images {
            // Keep counting so the error reports the real total.
            continue;
        }

        let data = read_field(field, max_file_size, &filename).await?;
        if data.is_empty() && filename.is_empty() {
            seen -= 1;
            continue;
        }

        let filename = if filename.is_empty() {
            format!("image-{}", images.len())
        } else {
            filename
        };

        images.push(UploadedImage::new(images.len(), filename, content_type, data));
    }

    if seen > max_images {
        return Err(AppError::TooManyImages {
            count: seen,
            max: max_images,
        });
    }

    if images.is_empty() {
        return Err(AppError::InvalidInput("No images provided".to_string()));
    }

    Ok(images)
}

async fn read_field(
    mut field: Field<'_>,
    max_file_size: usize,
    filename: &str,
) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "{} exceeds the maximum file size of {} MB",
                if filename.is_empty() { "File" } else { filename },
                max_file_size / 1024 / 1024
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Reduce a client filename to a printable basename for logs and extension checks.
pub fn sanitize_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = basename
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_FILENAME_LENGTH)
        .collect();

    if cleaned == "." || cleaned == ".." {
        String::new()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\cat.png"), "cat.png");
        assert_eq!(sanitize_filename("photo.jpg"), "photo.jpg");
    }

    #[test]
    fn test_sanitize_filename_drops_control_chars() {
        assert_eq!(sanitize_filename("a\nb\r.png"), "ab.png");
        assert_eq!(sanitize_filename(".."), "");
        assert_eq!(sanitize_filename(""), "");
    }

    #[test]
    fn test_sanitize_filename_truncates() {
        let long = "x".repeat(400) + ".png";
        assert_eq!(sanitize_filename(&long).chars().count(), MAX_FILENAME_LENGTH);
    }
}
