//! Client-side paging over fully fetched result sets.
//!
//! Two styles are supported: a growing prefix ("load more", page `n` shows
//! the first `n * page_size` items) and numbered pages (page `n` shows only
//! its own window).

use hpr_core::CategoryKey;
use hpr_core::error::{HprError, Result};

/// Paging position within one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    /// 1-based.
    pub current_page: usize,
    pub page_size: usize,
    pub category: CategoryKey,
}

impl PageState {
    /// Number of items the current page shows out of `total`.
    pub fn visible_len(&self, total: usize) -> usize {
        self.current_page.saturating_mul(self.page_size).min(total)
    }
}

/// Returns the visible prefix of `cached` for `state`.
pub fn materialize_page<'a, T>(cached: &'a [T], state: &PageState) -> &'a [T] {
    &cached[..state.visible_len(cached.len())]
}

/// Tracks the "load more" position of a listing view.
#[derive(Debug, Clone)]
pub struct PageSlicer {
    state: PageState,
    visible_len: usize,
    has_more: bool,
}

impl PageSlicer {
    /// Creates a slicer at page 1 of an unpartitioned listing.
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(HprError::config("page size must be positive"));
        }
        Ok(Self {
            state: PageState {
                current_page: 1,
                page_size,
                category: CategoryKey::all(),
            },
            visible_len: 0,
            has_more: true,
        })
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    /// Length of the last materialized page.
    pub fn visible_len(&self) -> usize {
        self.visible_len
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Returns to page 1 of `category` with nothing visible.
    ///
    /// `has_more` is assumed until the next materialization says otherwise.
    pub fn reset(&mut self, category: CategoryKey) {
        self.state.category = category;
        self.state.current_page = 1;
        self.visible_len = 0;
        self.has_more = true;
    }

    /// Slices the visible prefix of `cached` and recomputes `has_more`.
    pub fn materialize<'a, T>(&mut self, cached: &'a [T]) -> &'a [T] {
        let visible = materialize_page(cached, &self.state);
        self.visible_len = visible.len();
        self.has_more = visible.len() < cached.len();
        visible
    }

    /// Moves to the next page. Returns `false` (and changes nothing) when the
    /// last page is already shown.
    pub fn advance(&mut self) -> bool {
        if !self.has_more {
            return false;
        }
        self.state.current_page += 1;
        true
    }

    /// Number of numbered pages needed for `total` items.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.state.page_size)
    }

    /// Items of the 1-based numbered page `page`; empty past the end.
    pub fn page_window<'a, T>(&self, cached: &'a [T], page: usize) -> &'a [T] {
        let size = self.state.page_size;
        let start = page.saturating_sub(1).saturating_mul(size).min(cached.len());
        let end = start.saturating_add(size).min(cached.len());
        &cached[start..end]
    }
}
