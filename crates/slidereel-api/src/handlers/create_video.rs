use crate::constants::{IMAGE_COUNT_HEADER, VIDEO_DURATION_HEADER};
use crate::error::{ErrorResponse, HttpAppError};
use crate::middleware::request_id::RequestId;
use crate::state::AppState;
use crate::utils::upload::extract_images;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use slidereel_processing::VideoOutput;
use std::sync::Arc;

/// Create a video from uploaded images
///
/// Every file in the `images` field becomes one clip, in upload order. Each clip
/// lasts `max(30s / count, 1s)`; clips are centred on a canvas as large as the
/// largest image. The response body is the encoded video.
#[utoipa::path(
    post,
    path = "/create_video",
    tag = "video",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "One or more image files in the repeated `images` field"),
    responses(
        (status = 200, description = "Encoded video", body = Vec<u8>, content_type = "video/mp4"),
        (status = 400, description = "No images, malformed multipart body, or undecodable image", body = ErrorResponse),
        (status = 413, description = "File or request too large", body = ErrorResponse),
        (status = 415, description = "File is not a supported image", body = ErrorResponse),
        (status = 422, description = "Too many images", body = ErrorResponse),
        (status = 500, description = "Encoding failed", body = ErrorResponse),
        (status = 503, description = "All encoders busy", body = ErrorResponse),
        (status = 504, description = "Encoding timed out", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart, request_id),
    fields(request_id = %request_id.0, operation = "create_video")
)]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    let multipart = multipart?;
    let config = &state.config;

    let images = extract_images(
        multipart,
        config.max_images(),
        config.max_file_size_bytes(),
    )
    .await?;

    let total_bytes: usize = images.iter().map(|i| i.size()).sum();
    tracing::info!(
        image_count = images.len(),
        total_bytes = total_bytes,
        "Images received"
    );

    let output = state.pipeline.render(images).await?;

    Ok(video_response(output))
}

fn video_response(output: VideoOutput) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(output.content_type),
    );
    if let Ok(value) = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        output.filename
    )) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers.insert(
        HeaderName::from_static(IMAGE_COUNT_HEADER),
        HeaderValue::from(output.image_count),
    );
    if let Ok(value) = HeaderValue::from_str(&format!("{:.3}", output.duration_secs)) {
        headers.insert(HeaderName::from_static(VIDEO_DURATION_HEADER), value);
    }

    (StatusCode::OK, headers, output.data).into_response()
}
