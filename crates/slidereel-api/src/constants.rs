//! HTTP-level constants

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Number of images that went into a returned video.
pub const IMAGE_COUNT_HEADER: &str = "x-image-count";

/// Length of a returned video in seconds.
pub const VIDEO_DURATION_HEADER: &str = "x-video-duration";

pub const OPENAPI_PATH: &str = "/api/openapi.json";

pub const DOCS_PATH: &str = "/docs";
