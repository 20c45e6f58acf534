//! Category browser view model.
//!
//! Drives a category-tabbed, incrementally paged listing (the gallery, the
//! home page projects section). The view state is a plain `&mut self`
//! state machine; fetches run outside of it and are applied back through
//! [`CategoryBrowser::apply`], which discards completions that belong to a
//! selection the user has already left.

use hpr_core::error::Result;
use hpr_core::{CategoryKey, ContentItem, FailureKind, Notice};
use std::sync::Arc;

use crate::cache::CategoryCache;
use crate::pager::PageSlicer;
use crate::visibility::VisibilityTrigger;

/// Where a browser is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    /// No category selected yet.
    Idle,
    /// Waiting for the selected category's fetch.
    Loading,
    /// The selected category is cached and a page is materialized.
    Loaded,
    /// A further page is being materialized.
    LoadingMore,
    /// The selected category's fetch failed; the fallback is shown.
    Failed,
}

/// A fetch the caller must run and hand back to [`CategoryBrowser::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    category: CategoryKey,
    generation: u64,
}

impl FetchTicket {
    pub fn category(&self) -> &CategoryKey {
        &self.category
    }
}

/// Result of handing a completed fetch back to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The result became the visible state.
    Applied,
    /// The selection changed meanwhile; the result was ignored.
    Stale,
}

pub struct CategoryBrowser {
    cache: Arc<CategoryCache>,
    slicer: PageSlicer,
    trigger: VisibilityTrigger,
    initial: CategoryKey,
    selected: Option<CategoryKey>,
    /// Bumped on every selection; tickets from older selections are stale.
    generation: u64,
    source: Option<Arc<[ContentItem]>>,
    phase: ViewPhase,
    notice: Option<Notice>,
}

impl CategoryBrowser {
    /// Creates an idle browser that will open `initial` when first shown.
    pub fn new(
        cache: Arc<CategoryCache>,
        initial: CategoryKey,
        page_size: usize,
        visibility_threshold: f64,
    ) -> Result<Self> {
        Ok(Self {
            cache,
            slicer: PageSlicer::new(page_size)?,
            trigger: VisibilityTrigger::new(visibility_threshold)?,
            initial,
            selected: None,
            generation: 0,
            source: None,
            phase: ViewPhase::Idle,
            notice: None,
        })
    }

    pub fn cache(&self) -> &Arc<CategoryCache> {
        &self.cache
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn selected(&self) -> Option<&CategoryKey> {
        self.selected.as_ref()
    }

    pub fn current_page(&self) -> usize {
        self.slicer.current_page()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Items currently shown.
    pub fn visible(&self) -> &[ContentItem] {
        match &self.source {
            Some(items) => &items[..self.slicer.visible_len()],
            None => &[],
        }
    }

    /// Whether "load more" should be offered.
    pub fn has_more(&self) -> bool {
        self.slicer.has_more()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ViewPhase::Loading | ViewPhase::LoadingMore)
    }

    /// Whether the "no content yet" fallback should be rendered.
    pub fn show_fallback(&self) -> bool {
        matches!(self.phase, ViewPhase::Loaded | ViewPhase::Failed) && self.visible().is_empty()
    }

    /// The section container has been rendered.
    pub fn attach(&mut self) {
        self.trigger.attach();
    }

    /// The section container is being torn down.
    pub fn detach(&mut self) {
        self.trigger.detach();
    }

    /// Reports the container's visible fraction. Selects the initial category
    /// the first time the threshold is reached.
    pub fn on_visible(&mut self, visible_fraction: f64) -> Option<FetchTicket> {
        if self.trigger.observe(visible_fraction) {
            self.select(self.initial.clone())
        } else {
            None
        }
    }

    /// Switches to `category` at page 1.
    ///
    /// A cached category is shown immediately and `None` is returned;
    /// otherwise the browser enters [`ViewPhase::Loading`] and returns the
    /// fetch to run.
    pub fn select(&mut self, category: CategoryKey) -> Option<FetchTicket> {
        self.generation += 1;
        self.slicer.reset(category.clone());
        self.selected = Some(category.clone());
        self.source = None;
        self.notice = None;

        if let Some(items) = self.cache.peek(&category) {
            tracing::debug!(category = %category, "Showing cached category");
            self.show(items);
            return None;
        }

        self.phase = ViewPhase::Loading;
        Some(FetchTicket {
            category,
            generation: self.generation,
        })
    }

    /// Applies a completed fetch if it still matches the current selection.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        result: Result<Arc<[ContentItem]>>,
    ) -> ApplyOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                category = %ticket.category,
                "Discarding result of an abandoned selection"
            );
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(items) => self.show(items),
            Err(e) => {
                tracing::warn!(category = %ticket.category, "Failed to load category: {}", e);
                self.source = None;
                self.slicer.materialize::<ContentItem>(&[]);
                self.phase = ViewPhase::Failed;
                self.notice = Some(Notice::from_error(
                    FailureKind::Fetch,
                    "Failed to load content",
                    &e,
                ));
            }
        }
        ApplyOutcome::Applied
    }

    /// Shows one more page. Returns `false` when there is nothing more to
    /// show or the current category is not loaded.
    pub fn load_more(&mut self) -> bool {
        if self.phase != ViewPhase::Loaded || !self.slicer.has_more() {
            return false;
        }
        let Some(items) = self.source.clone() else {
            return false;
        };

        self.phase = ViewPhase::LoadingMore;
        self.slicer.advance();
        self.slicer.materialize(&items);
        self.phase = ViewPhase::Loaded;
        true
    }

    /// Selects `category` and, if needed, fetches and applies it.
    pub async fn open(&mut self, category: CategoryKey) -> ApplyOutcome {
        match self.select(category) {
            Some(ticket) => {
                let cache = Arc::clone(&self.cache);
                let result = cache.get_or_fetch(ticket.category()).await;
                self.apply(ticket, result)
            }
            None => ApplyOutcome::Applied,
        }
    }

    fn show(&mut self, items: Arc<[ContentItem]>) {
        self.slicer.materialize(&items);
        self.source = Some(items);
        self.phase = ViewPhase::Loaded;
    }
}
