//! Content items as delivered by the backend.
//!
//! Items are opaque records: an optional id, an optional image payload and
//! whatever display fields the section carries.

mod image;
mod model;

pub use image::{BinaryImage, DEFAULT_IMAGE_MIME, ImagePayload, data_uri};
pub use model::{ContentItem, ItemId};
