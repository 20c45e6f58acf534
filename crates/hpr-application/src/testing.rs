//! In-memory repository used by the unit tests of this crate.

use async_trait::async_trait;
use hpr_core::error::Result;
use hpr_core::{
    BinaryImage, CategoryKey, Collection, ContentForm, ContentItem, ContentRepository, HprError,
    ItemId,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
struct State {
    /// Items by category key; `*` holds unpartitioned collections.
    lists: HashMap<String, Vec<ContentItem>>,
    documents: HashMap<Collection, Map<String, Value>>,
    fail_lists: usize,
    fail_documents: usize,
    fail_mutations: usize,
    fail_banners: usize,
    next_id: u64,
}

pub struct MockRepository {
    state: Mutex<State>,
    latency: Option<Duration>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    document_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
    banner_calls: AtomicUsize,
}

pub fn item(id: &str, category: &str) -> ContentItem {
    ContentItem::new(id)
        .with_field("title", format!("Item {}", id))
        .with_field("category", category)
}

impl MockRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 100,
                ..Default::default()
            }),
            latency: None,
            list_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            document_calls: AtomicUsize::new(0),
            mutation_calls: AtomicUsize::new(0),
            banner_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Stores `count` generated items under `category`.
    pub fn put_category(&self, category: &str, count: usize) {
        let items = (0..count)
            .map(|i| item(&format!("{}-{}", category, i), category))
            .collect();
        self.put_items(category, items);
    }

    pub fn put_items(&self, category: &str, items: Vec<ContentItem>) {
        self.state
            .lock()
            .unwrap()
            .lists
            .insert(category.to_string(), items);
    }

    /// Stores a singleton document without counting a mutation.
    pub fn seed_document(&self, collection: Collection, fields: Map<String, Value>) {
        self.state
            .lock()
            .unwrap()
            .documents
            .insert(collection, fields);
    }

    pub fn fail_next_lists(&self, count: usize) {
        self.state.lock().unwrap().fail_lists = count;
    }

    pub fn fail_next_documents(&self, count: usize) {
        self.state.lock().unwrap().fail_documents = count;
    }

    pub fn fail_next_mutations(&self, count: usize) {
        self.state.lock().unwrap().fail_mutations = count;
    }

    pub fn fail_next_banners(&self, count: usize) {
        self.state.lock().unwrap().fail_banners = count;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    pub fn banner_calls(&self) -> usize {
        self.banner_calls.load(Ordering::SeqCst)
    }

    pub fn items(&self, category: &str) -> Vec<ContentItem> {
        self.state
            .lock()
            .unwrap()
            .lists
            .get(category)
            .cloned()
            .unwrap_or_default()
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn begin_mutation(&self) -> Result<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if state.fail_mutations > 0 {
            state.fail_mutations -= 1;
            return Err(HprError::http(500, "mutation rejected"));
        }
        Ok(())
    }
}

fn form_item(id: ItemId, form: &ContentForm) -> ContentItem {
    let mut item = ContentItem {
        id: Some(id),
        ..Default::default()
    };
    for (name, value) in &form.fields {
        item.fields.insert(name.clone(), Value::String(value.clone()));
    }
    item
}

#[async_trait]
impl ContentRepository for MockRepository {
    async fn list(&self, _collection: Collection, category: &CategoryKey) -> Result<Vec<ContentItem>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        let mut state = self.state.lock().unwrap();
        if state.fail_lists > 0 {
            state.fail_lists -= 1;
            return Err(HprError::network("connection refused"));
        }
        Ok(state.lists.get(category.as_str()).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: &ItemId) -> Result<ContentItem> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        let state = self.state.lock().unwrap();
        state
            .lists
            .values()
            .flatten()
            .find(|item| item.id.as_ref() == Some(id))
            .cloned()
            .ok_or_else(|| HprError::not_found(collection.slug(), id.as_str()))
    }

    async fn document(&self, collection: Collection) -> Result<Option<ContentItem>> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        let mut state = self.state.lock().unwrap();
        if state.fail_documents > 0 {
            state.fail_documents -= 1;
            return Err(HprError::network("connection refused"));
        }
        Ok(state.documents.get(&collection).map(|fields| ContentItem {
            fields: fields.clone(),
            ..Default::default()
        }))
    }

    async fn create(&self, _collection: Collection, form: &ContentForm) -> Result<()> {
        self.begin_mutation()?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let item = form_item(ItemId::from(state.next_id), form);
        state.lists.entry("*".to_string()).or_default().push(item);
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &ItemId, form: &ContentForm) -> Result<()> {
        self.begin_mutation()?;
        let mut state = self.state.lock().unwrap();
        let items = state.lists.entry("*".to_string()).or_default();
        let slot = items
            .iter_mut()
            .find(|item| item.id.as_ref() == Some(id))
            .ok_or_else(|| HprError::not_found(collection.slug(), id.as_str()))?;
        *slot = form_item(id.clone(), form);
        Ok(())
    }

    async fn delete(&self, _collection: Collection, id: &ItemId) -> Result<()> {
        self.begin_mutation()?;
        let mut state = self.state.lock().unwrap();
        if let Some(items) = state.lists.get_mut("*") {
            items.retain(|item| item.id.as_ref() != Some(id));
        }
        Ok(())
    }

    async fn put_document(&self, collection: Collection, fields: &Map<String, Value>) -> Result<()> {
        self.begin_mutation()?;
        self.state
            .lock()
            .unwrap()
            .documents
            .insert(collection, fields.clone());
        Ok(())
    }

    async fn banner(&self) -> Result<BinaryImage> {
        self.banner_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if state.fail_banners > 0 {
            state.fail_banners -= 1;
            return Err(HprError::http(404, "no banner"));
        }
        Ok(BinaryImage::new(Some("image/png"), vec![1, 2, 3]))
    }
}
