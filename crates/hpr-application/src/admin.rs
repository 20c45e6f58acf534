//! Admin view models for editing site sections.
//!
//! Every mutation is followed by a full re-fetch of the section; nothing is
//! updated optimistically, so a failed request leaves the shown list exactly
//! as it was.

use hpr_core::error::Result;
use hpr_core::{
    CategoryKey, Collection, CollectionKind, ContentForm, ContentItem, ContentRepository, FailureKind, HprError,
    ItemId, Notice,
};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::pager::PageSlicer;
use crate::visibility::VisibilityTrigger;

/// CRUD list editor for one editable collection.
pub struct AdminSection {
    repository: Arc<dyn ContentRepository>,
    collection: Collection,
    items: Vec<ContentItem>,
    form: ContentForm,
    trigger: VisibilityTrigger,
    pages: PageSlicer,
    page: usize,
    loading: bool,
    notice: Option<Notice>,
}

impl AdminSection {
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        collection: Collection,
        page_size: usize,
        visibility_threshold: f64,
    ) -> Result<Self> {
        collection.ensure_editable()?;
        Ok(Self {
            repository,
            collection,
            items: Vec::new(),
            form: ContentForm::new(),
            trigger: VisibilityTrigger::new(visibility_threshold)?,
            pages: PageSlicer::new(page_size)?,
            page: 1,
            loading: false,
            notice: None,
        })
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn form(&self) -> &ContentForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContentForm {
        &mut self.form
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// The section container has been rendered.
    pub fn attach(&mut self) {
        self.trigger.attach();
    }

    pub fn detach(&mut self) {
        self.trigger.detach();
    }

    /// Loads the list the first time the section becomes visible enough.
    ///
    /// Returns whether this call triggered the load.
    pub async fn on_visible(&mut self, visible_fraction: f64) -> bool {
        if !self.trigger.observe(visible_fraction) {
            return false;
        }
        if let Err(e) = self.refresh().await {
            tracing::debug!(collection = %self.collection, "Initial load failed: {}", e);
        }
        true
    }

    /// Re-fetches the whole list, reporting a failure through the notice.
    pub async fn refresh(&mut self) -> Result<()> {
        if let Err(e) = self.reload().await {
            tracing::warn!(collection = %self.collection, "Failed to load items: {}", e);
            self.notice = Some(Notice::from_error(
                FailureKind::Fetch,
                &format!("Failed to load {}", self.collection),
                &e,
            ));
            return Err(e);
        }
        Ok(())
    }

    /// Re-fetches the whole list; on failure the shown items are kept.
    async fn reload(&mut self) -> Result<()> {
        self.loading = true;
        let result = self
            .repository
            .list(self.collection, &CategoryKey::all())
            .await;
        self.loading = false;

        let items = result?;
        tracing::debug!(collection = %self.collection, "Loaded {} items", items.len());
        self.items = items;
        self.clamp_page();
        Ok(())
    }

    /// Re-fetches after a successful mutation. The mutation already
    /// happened, so a failed re-fetch only leaves the list stale.
    async fn reload_after_mutation(&mut self) {
        if let Err(e) = self.reload().await {
            tracing::warn!(
                collection = %self.collection,
                "Saved, but the list could not be reloaded: {}",
                e
            );
        }
    }

    /// Starts editing `item`.
    pub fn edit(&mut self, item: &ContentItem) {
        self.form = ContentForm::edit(item, &self.collection.form_schema());
    }

    /// Abandons the current form.
    pub fn cancel_edit(&mut self) {
        self.form.reset();
    }

    /// Validates and submits the form, then re-fetches the list.
    ///
    /// Invalid forms are rejected without any request. The result reflects
    /// the mutation alone; the re-fetch after it never turns it into an error.
    pub async fn submit(&mut self) -> Result<()> {
        if let Err(e) = self.form.validate(&self.collection.form_schema()) {
            self.notice = Some(Notice::from_error(
                FailureKind::Validation,
                "All fields are required",
                &e,
            ));
            return Err(e);
        }

        let (result, verb) = match self.form.editing.clone() {
            Some(id) => (
                self.repository.update(self.collection, &id, &self.form).await,
                "updated",
            ),
            None => (
                self.repository.create(self.collection, &self.form).await,
                "added",
            ),
        };

        if let Err(e) = result {
            tracing::warn!(collection = %self.collection, "Submit failed: {}", e);
            self.notice = Some(Notice::from_error(FailureKind::Mutation, "Operation failed", &e));
            return Err(e);
        }

        tracing::info!(collection = %self.collection, "Item {}", verb);
        self.form.reset();
        self.notice = Some(Notice::success(format!("{} item {}", self.collection, verb)));
        self.reload_after_mutation().await;
        Ok(())
    }

    /// Deletes `id`, then re-fetches the list.
    pub async fn delete(&mut self, id: &ItemId) -> Result<()> {
        if let Err(e) = self.repository.delete(self.collection, id).await {
            tracing::warn!(collection = %self.collection, id = %id, "Delete failed: {}", e);
            self.notice = Some(Notice::from_error(FailureKind::Mutation, "Failed to delete", &e));
            return Err(e);
        }

        if self.form.editing.as_ref() == Some(id) {
            self.form.reset();
        }
        self.notice = Some(Notice::success(format!("{} item deleted", self.collection)));
        self.reload_after_mutation().await;
        Ok(())
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.pages.total_pages(self.items.len())
    }

    /// Items of the current numbered page.
    pub fn page_items(&self) -> &[ContentItem] {
        self.pages.page_window(&self.items, self.page)
    }

    /// Jumps to a numbered page, clamped to the available range.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    fn clamp_page(&mut self) {
        self.go_to_page(self.page);
    }
}

/// Editor for a single-document section (the mission statement).
pub struct DocumentSection {
    repository: Arc<dyn ContentRepository>,
    collection: Collection,
    fields: Map<String, Value>,
    loaded: bool,
    notice: Option<Notice>,
}

impl DocumentSection {
    pub fn new(repository: Arc<dyn ContentRepository>, collection: Collection) -> Result<Self> {
        if !collection.is_document() {
            return Err(HprError::unsupported(format!(
                "{} is not a single-document section",
                collection
            )));
        }
        Ok(Self {
            repository,
            collection,
            fields: Map::new(),
            loaded: false,
            notice: None,
        })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Loads the document. A missing document leaves the fields empty.
    pub async fn load(&mut self) -> Result<()> {
        match self.repository.document(self.collection).await {
            Ok(document) => {
                self.fields = document.map(|item| item.fields).unwrap_or_default();
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(collection = %self.collection, "Failed to load document: {}", e);
                self.notice = Some(Notice::from_error(
                    FailureKind::Fetch,
                    &format!("Failed to fetch {}", self.collection),
                    &e,
                ));
                Err(e)
            }
        }
    }

    /// Validates and replaces the document.
    pub async fn save(&mut self, form: &ContentForm) -> Result<()> {
        if self.collection.kind() != CollectionKind::EditableDocument {
            return Err(HprError::unsupported(format!("{} is read-only", self.collection)));
        }
        if let Err(e) = form.validate(&self.collection.form_schema()) {
            self.notice = Some(Notice::from_error(
                FailureKind::Validation,
                "Please fill in every field",
                &e,
            ));
            return Err(e);
        }

        let fields: Map<String, Value> = form
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        if let Err(e) = self.repository.put_document(self.collection, &fields).await {
            tracing::warn!(collection = %self.collection, "Update failed: {}", e);
            self.notice = Some(Notice::from_error(FailureKind::Mutation, "Update failed", &e));
            return Err(e);
        }

        self.fields = fields;
        self.notice = Some(Notice::success(format!("{} updated", self.collection)));
        Ok(())
    }
}
