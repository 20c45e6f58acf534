//! Domain layer of the HPR content client.
//!
//! Types shared by every crate: content items, categories, collections,
//! admin forms, notices, configuration and the repository trait.

pub mod category;
pub mod collection;
pub mod config;
pub mod content;
pub mod error;
pub mod form;
pub mod notice;
pub mod repository;

// Re-export common types
pub use category::{CategoryKey, ProjectStatus};
pub use collection::{Collection, CollectionKind, FormSchema};
pub use content::{BinaryImage, ContentItem, ImagePayload, ItemId};
pub use error::{FailureKind, HprError};
pub use form::{ContentForm, ImageUpload};
pub use notice::{Notice, NoticeLevel};
pub use repository::ContentRepository;
