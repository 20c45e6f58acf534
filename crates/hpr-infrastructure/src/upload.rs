//! Reading image files for admin uploads.

use hpr_core::ImageUpload;
use hpr_core::error::{HprError, Result};
use std::path::Path;

/// Infers the MIME type from a filename extension using the `mime_guess` library.
fn infer_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

/// Reads `path` into an [`ImageUpload`], rejecting files that are not images.
pub fn read_image(path: &Path) -> Result<ImageUpload> {
    let mime = infer_mime_type(path);
    if !mime.starts_with("image/") {
        return Err(HprError::validation([format!(
            "image ({} is {}, not an image)",
            path.display(),
            mime
        )]));
    }

    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    tracing::debug!(file = %file_name, mime = %mime, size = bytes.len(), "Image read");
    Ok(ImageUpload::new(file_name, mime, bytes))
}
