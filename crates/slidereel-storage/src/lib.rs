//! Slidereel Storage Library
//!
//! Per-request working storage. Every request gets its own [`Workspace`], a directory
//! under the configured work root that holds the uploaded images and the encoded
//! output, and that disappears when the workspace is dropped.
//!
//! # Key format
//!
//! Image keys are generated, never taken from the client: `{index:04}-{uuid}.{ext}`.
//! Keys must not contain `..`, path separators or a leading `/`. Key generation is
//! centralized in the `keys` module.

pub mod factory;
pub(crate) mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::WorkspaceProvider;
pub use local::LocalWorkspace;
pub use traits::{StorageError, StorageResult, StoredImage, Workspace};
