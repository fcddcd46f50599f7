//! Shared key generation and validation for workspaces.
//!
//! Image keys look like `0003-6f1c...e2.png`: the zero-padded upload index keeps
//! directory listings in upload order, the UUID keeps keys collision-free even when
//! a client sends the same filename twice.

use crate::traits::{StorageError, StorageResult};
use uuid::Uuid;

const MAX_EXTENSION_LENGTH: usize = 8;

/// Generate a storage key for the image at `index`.
pub fn generate_image_key(index: usize, extension: &str) -> StorageResult<String> {
    let extension = normalize_extension(extension)?;
    Ok(format!("{:04}-{}.{}", index, Uuid::new_v4(), extension))
}

/// Reject keys that could leave the workspace directory.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }

    if key.contains("..") || key.starts_with('/') || key.contains('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    if key.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidKey(
            "Storage key contains control characters".to_string(),
        ));
    }

    Ok(())
}

fn normalize_extension(extension: &str) -> StorageResult<String> {
    let extension = extension.trim_start_matches('.').to_lowercase();
    if extension.is_empty()
        || extension.len() > MAX_EXTENSION_LENGTH
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(StorageError::InvalidKey(format!(
            "Invalid file extension: {:?}",
            extension
        )));
    }
    Ok(extension)
}
