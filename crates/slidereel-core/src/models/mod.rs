//! Domain models shared across crates.

pub mod clip;
pub mod image;
pub mod render;

pub use clip::{Clip, ClipPlan};
pub use image::{FrameSize, UploadedImage};
pub use render::RenderSettings;
