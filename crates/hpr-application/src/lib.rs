//! Application layer for HPR.
//!
//! View models that sit between a renderer and the content backend:
//! fetch-once caches, client-side paging, one-shot visibility triggers, and
//! the listing, public section, admin and news views built from them. Nothing here depends on
//! a UI toolkit.

pub mod admin;
pub mod browser;
pub mod cache;
pub mod news;
pub mod pager;
pub mod section;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use admin::{AdminSection, DocumentSection};
pub use browser::{ApplyOutcome, CategoryBrowser, FetchTicket, ViewPhase};
pub use cache::{CategoryCache, OnceMap};
pub use news::NewsFeed;
pub use pager::{PageSlicer, PageState, materialize_page};
pub use section::{AboutPage, PublicSection, SectionContent};
pub use visibility::{TriggerState, VisibilityTrigger};
