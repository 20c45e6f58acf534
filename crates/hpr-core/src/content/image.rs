//! Image payload decoding and display-source conversion.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// MIME type assumed when the backend does not report one.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Image data embedded in a content item.
///
/// The backend sends either a base64 string or a Node buffer object
/// (`{ "type": "Buffer", "data": [..] }`) depending on the section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImagePayload {
    Base64(String),
    Buffer { data: Vec<u8> },
}

impl ImagePayload {
    /// Returns the raw image bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Base64(encoded) => Ok(STANDARD.decode(encoded.trim())?),
            Self::Buffer { data } => Ok(data.clone()),
        }
    }

    /// Returns the payload as base64 text.
    pub fn to_base64(&self) -> String {
        match self {
            Self::Base64(encoded) => encoded.trim().to_string(),
            Self::Buffer { data } => STANDARD.encode(data),
        }
    }

    /// Builds a `data:` URI suitable for an `<img src>`.
    pub fn to_data_uri(&self, mime: &str) -> String {
        format!("data:{};base64,{}", mime, self.to_base64())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Base64(encoded) => encoded.trim().is_empty(),
            Self::Buffer { data } => data.is_empty(),
        }
    }
}

/// A standalone binary image response (e.g. the news banner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl BinaryImage {
    pub fn new(content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();
        Self {
            content_type,
            bytes,
        }
    }

    pub fn to_data_uri(&self) -> String {
        data_uri(&self.content_type, &self.bytes)
    }
}

/// Encodes raw bytes as a `data:` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
