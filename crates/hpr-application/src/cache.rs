//! Fetch-once caches.
//!
//! [`OnceMap`] memoizes one asynchronously produced value per key and makes
//! sure only one producer runs per key at a time. [`CategoryCache`] builds the
//! per-category listing cache on top of it.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use hpr_core::error::{HprError, Result};
use hpr_core::{CategoryKey, Collection, ContentItem, ContentRepository};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

type InFlight<V, E> = Shared<BoxFuture<'static, std::result::Result<V, E>>>;

enum Slot<V, E> {
    Ready(V),
    /// `attempt` tells a finished waiter whether the slot still belongs to it.
    Pending { attempt: u64, fetch: InFlight<V, E> },
}

struct Slots<K, V, E> {
    entries: HashMap<K, Slot<V, E>>,
    attempts: u64,
}

/// Per-key memoization of async results.
///
/// Concurrent callers for a key share one in-flight producer and all receive
/// its outcome, success or failure. A failure leaves the key empty so a later
/// call starts a new producer. Entries are never evicted.
pub struct OnceMap<K, V, E = HprError> {
    /// Never held across an await point.
    slots: Mutex<Slots<K, V, E>>,
}

impl<K, V, E> OnceMap<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                entries: HashMap::new(),
                attempts: 0,
            }),
        }
    }

    /// Returns the stored value without initializing.
    pub fn get(&self, key: &K) -> Option<V> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots.entries.get(key) {
            Some(Slot::Ready(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Returns the stored value or runs `init` to produce it.
    ///
    /// If a producer for `key` is already running, `init` is not called and
    /// the caller waits for that producer's result instead.
    pub async fn get_or_try_init<F, Fut>(&self, key: &K, init: F) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
    {
        let (attempt, fetch) = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            match slots.entries.get(key) {
                Some(Slot::Ready(value)) => return Ok(value.clone()),
                Some(Slot::Pending { attempt, fetch }) => (*attempt, fetch.clone()),
                None => {
                    slots.attempts += 1;
                    let attempt = slots.attempts;
                    let fetch = init().boxed().shared();
                    slots.entries.insert(
                        key.clone(),
                        Slot::Pending {
                            attempt,
                            fetch: fetch.clone(),
                        },
                    );
                    (attempt, fetch)
                }
            }
        };

        let result = fetch.await;

        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let owns_slot = matches!(
            slots.entries.get(key),
            Some(Slot::Pending { attempt: current, .. }) if *current == attempt
        );
        if owns_slot {
            match &result {
                Ok(value) => {
                    slots.entries.insert(key.clone(), Slot::Ready(value.clone()));
                }
                Err(_) => {
                    slots.entries.remove(key);
                }
            }
        }
        result
    }

    /// Number of initialized keys.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .entries
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V, E> Default for OnceMap<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Full result sets of one collection, keyed by category.
///
/// Each category is fetched at most once per cache lifetime; a category
/// whose fetch failed stays absent and is fetched again on the next call.
/// Entries may go stale relative to the backend; nothing invalidates them.
pub struct CategoryCache {
    repository: Arc<dyn ContentRepository>,
    collection: Collection,
    entries: OnceMap<CategoryKey, Arc<[ContentItem]>>,
}

impl CategoryCache {
    pub fn new(repository: Arc<dyn ContentRepository>, collection: Collection) -> Self {
        Self {
            repository,
            collection,
            entries: OnceMap::new(),
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Returns the cached items of `category`, fetching them on first use.
    pub async fn get_or_fetch(&self, category: &CategoryKey) -> Result<Arc<[ContentItem]>> {
        if let Some(items) = self.entries.get(category) {
            tracing::debug!(
                collection = %self.collection,
                category = %category,
                "Category cache hit ({} items)",
                items.len()
            );
            return Ok(items);
        }

        let repository = Arc::clone(&self.repository);
        let collection = self.collection;
        let key = category.clone();
        self.entries
            .get_or_try_init(category, move || async move {
                tracing::debug!(collection = %collection, category = %key, "Fetching category");
                match repository.list(collection, &key).await {
                    Ok(items) => {
                        tracing::info!(
                            collection = %collection,
                            category = %key,
                            "Cached {} items",
                            items.len()
                        );
                        Ok(Arc::from(items))
                    }
                    Err(e) => {
                        tracing::warn!(
                            collection = %collection,
                            category = %key,
                            "Category fetch failed: {}",
                            e
                        );
                        Err(e)
                    }
                }
            })
            .await
    }

    /// Returns the cached items of `category` without fetching.
    pub fn peek(&self, category: &CategoryKey) -> Option<Arc<[ContentItem]>> {
        self.entries.get(category)
    }

    pub fn contains(&self, category: &CategoryKey) -> bool {
        self.peek(category).is_some()
    }

    /// Number of cached categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
