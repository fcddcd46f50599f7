//! Slidereel API Library
//!
//! HTTP surface of the slideshow service: the upload form, the `create_video`
//! endpoint, health probes and the OpenAPI document.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod setup;
pub mod telemetry;
mod utils;

pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
