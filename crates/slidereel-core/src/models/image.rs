use serde::{Deserialize, Serialize};

/// An image received in the `images` multipart field.
///
/// `original_filename` is client supplied and only used for logging and extension
/// checks; it never becomes part of a filesystem path.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Position in the upload, starting at zero.
    pub index: usize,
    pub original_filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    pub fn new(
        index: usize,
        original_filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            index,
            original_filename: original_filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Pixel dimensions of an image or a video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixels(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Round both sides up to the next even number (required by yuv420p).
    pub fn to_even(self) -> Self {
        Self {
            width: self.width + (self.width % 2),
            height: self.height + (self.height % 2),
        }
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
