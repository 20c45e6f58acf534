//! Repository trait for backend content access.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::category::CategoryKey;
use crate::collection::Collection;
use crate::content::{BinaryImage, ContentItem, ItemId};
use crate::error::Result;
use crate::form::ContentForm;

/// Access to the site's content backend.
///
/// The backend has no server-side paging: `list` always returns the full
/// collection (or the full category partition).
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Lists every item of a collection, filtered by `category` unless it is
    /// [`CategoryKey::all`].
    async fn list(&self, collection: Collection, category: &CategoryKey)
    -> Result<Vec<ContentItem>>;

    /// Fetches a single item by id.
    async fn get(&self, collection: Collection, id: &ItemId) -> Result<ContentItem>;

    /// Fetches a single-document section (mission statement, footer, ...).
    ///
    /// Returns `None` when the backend has no document yet.
    async fn document(&self, collection: Collection) -> Result<Option<ContentItem>>;

    /// Creates an item from a validated form.
    async fn create(&self, collection: Collection, form: &ContentForm) -> Result<()>;

    /// Updates the item `id` from a validated form.
    async fn update(&self, collection: Collection, id: &ItemId, form: &ContentForm)
    -> Result<()>;

    /// Deletes the item `id`.
    async fn delete(&self, collection: Collection, id: &ItemId) -> Result<()>;

    /// Replaces a single-document section.
    async fn put_document(&self, collection: Collection, fields: &Map<String, Value>)
    -> Result<()>;

    /// Fetches the news banner image.
    async fn banner(&self) -> Result<BinaryImage>;
}
