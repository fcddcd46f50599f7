pub mod create_video;
pub mod health;
pub mod index;

use crate::error::HttpAppError;
use axum::http::Uri;
use slidereel_core::AppError;

/// JSON 404 for unknown paths.
pub async fn not_found(uri: Uri) -> HttpAppError {
    AppError::NotFound(format!("No route for {}", uri.path())).into()
}
