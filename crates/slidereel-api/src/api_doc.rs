//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Slidereel API",
        version = "0.1.0",
        description = "Turns an ordered set of uploaded images into a single video. Each image is shown for an equal share of 30 seconds (at least one second), centred on a canvas sized to the largest image."
    ),
    paths(
        handlers::create_video::create_video,
        handlers::health::health_check,
        handlers::health::liveness_check,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::health::HealthCheckResponse,
    )),
    tags(
        (name = "video", description = "Video creation"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_endpoints() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/create_video"));
        assert!(spec.paths.paths.contains_key("/health"));
    }
}
