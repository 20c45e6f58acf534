//! Read-only views of the public site sections.
//!
//! Lists (hero carousel, testimonials, company values, about sections,
//! partners) and single documents (footer, about-us, mission statement) are
//! loaded once, when their container first becomes visible, and kept for the
//! lifetime of the view.

use hpr_core::error::{HprError, Result};
use hpr_core::{
    CategoryKey, Collection, ContentItem, ContentRepository, FailureKind, Notice,
};
use std::sync::Arc;

use crate::cache::{CategoryCache, OnceMap};
use crate::visibility::VisibilityTrigger;

/// What a loaded section holds.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Items(Arc<[ContentItem]>),
    /// `None` when the backend has no document yet.
    Document(Option<ContentItem>),
}

impl SectionContent {
    /// Whether a renderer should show the section's placeholder instead.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Items(items) => items.is_empty(),
            Self::Document(document) => document.is_none(),
        }
    }
}

enum Source {
    List(CategoryCache),
    Document(OnceMap<Collection, Option<ContentItem>>),
}

/// A visitor-facing section that is fetched at most once.
pub struct PublicSection {
    repository: Arc<dyn ContentRepository>,
    collection: Collection,
    source: Source,
    trigger: VisibilityTrigger,
    notice: Option<Notice>,
}

impl PublicSection {
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        collection: Collection,
        visibility_threshold: f64,
    ) -> Result<Self> {
        if collection.is_categorized() {
            return Err(HprError::unsupported(format!(
                "{} is browsed by category",
                collection
            )));
        }
        let source = if collection.is_document() {
            Source::Document(OnceMap::new())
        } else {
            Source::List(CategoryCache::new(repository.clone(), collection))
        };
        Ok(Self {
            repository,
            collection,
            source,
            trigger: VisibilityTrigger::new(visibility_threshold)?,
            notice: None,
        })
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn attach(&mut self) {
        self.trigger.attach();
    }

    pub fn detach(&mut self) {
        self.trigger.detach();
    }

    /// Loads the section the first time it becomes visible enough.
    ///
    /// Returns whether this call triggered the load.
    pub async fn on_visible(&mut self, visible_fraction: f64) -> bool {
        if !self.trigger.observe(visible_fraction) {
            return false;
        }
        if let Err(e) = self.load().await {
            tracing::debug!(collection = %self.collection, "Section load failed: {}", e);
        }
        true
    }

    /// Returns the section content, fetching it on first use.
    ///
    /// A failure is reported through the notice and fetched again next time.
    pub async fn load(&mut self) -> Result<SectionContent> {
        let result = match &self.source {
            Source::List(cache) => cache
                .get_or_fetch(&CategoryKey::all())
                .await
                .map(SectionContent::Items),
            Source::Document(slot) => {
                let repository = Arc::clone(&self.repository);
                let collection = self.collection;
                slot.get_or_try_init(&collection, move || async move {
                    repository.document(collection).await
                })
                .await
                .map(SectionContent::Document)
            }
        };

        match result {
            Ok(content) => {
                self.notice = None;
                Ok(content)
            }
            Err(e) => {
                tracing::warn!(collection = %self.collection, "Failed to load section: {}", e);
                self.notice = Some(Notice::from_error(
                    FailureKind::Fetch,
                    &format!("Failed to load {}", self.collection),
                    &e,
                ));
                Err(e)
            }
        }
    }

    /// The loaded content, without fetching.
    pub fn content(&self) -> Option<SectionContent> {
        match &self.source {
            Source::List(cache) => cache.peek(&CategoryKey::all()).map(SectionContent::Items),
            Source::Document(slot) => slot.get(&self.collection).map(SectionContent::Document),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.content().is_some()
    }

    /// Loaded but empty: the renderer shows a placeholder.
    pub fn show_fallback(&self) -> bool {
        self.content().is_some_and(|content| content.is_empty())
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

/// The about page: its intro document, its sections and the partner list.
///
/// Each part loads on its own; one failing leaves the others shown.
pub struct AboutPage {
    intro: PublicSection,
    sections: PublicSection,
    partners: PublicSection,
}

impl AboutPage {
    pub fn new(repository: Arc<dyn ContentRepository>, visibility_threshold: f64) -> Result<Self> {
        Ok(Self {
            intro: PublicSection::new(repository.clone(), Collection::AboutUs, visibility_threshold)?,
            sections: PublicSection::new(
                repository.clone(),
                Collection::AboutSections,
                visibility_threshold,
            )?,
            partners: PublicSection::new(repository, Collection::Partners, visibility_threshold)?,
        })
    }

    /// Loads every part concurrently and returns how many failed.
    pub async fn load(&mut self) -> usize {
        let (intro, sections, partners) = futures::join!(
            self.intro.load(),
            self.sections.load(),
            self.partners.load(),
        );
        [intro.is_err(), sections.is_err(), partners.is_err()]
            .into_iter()
            .filter(|failed| *failed)
            .count()
    }

    pub fn intro(&self) -> &PublicSection {
        &self.intro
    }

    pub fn sections(&self) -> &PublicSection {
        &self.sections
    }

    pub fn partners(&self) -> &PublicSection {
        &self.partners
    }

    pub fn parts(&self) -> [&PublicSection; 3] {
        [&self.intro, &self.sections, &self.partners]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockRepository, item};
    use serde_json::{Map, Value};

    fn items(content: Option<SectionContent>) -> Arc<[ContentItem]> {
        match content {
            Some(SectionContent::Items(items)) => items,
            other => panic!("expected items, got {:?}", other),
        }
    }

    #[test]
    fn test_gallery_is_not_a_public_section() {
        let repo = Arc::new(MockRepository::new());
        assert!(PublicSection::new(repo.clone(), Collection::Gallery, 0.2).is_err());
        assert!(PublicSection::new(repo, Collection::Testimonials, 1.5).is_err());
    }

    #[tokio::test]
    async fn test_list_section_loads_once_when_visible() {
        let repo = Arc::new(MockRepository::new());
        repo.put_items("*", vec![item("1", "*"), item("2", "*")]);
        let mut values = PublicSection::new(repo.clone(), Collection::CompanyValues, 0.2).unwrap();

        assert!(!values.on_visible(1.0).await);
        values.attach();
        assert!(values.on_visible(0.5).await);
        assert!(!values.on_visible(1.0).await);
        values.load().await.unwrap();

        assert_eq!(items(values.content()).len(), 2);
        assert!(!values.show_fallback());
        assert_eq!(repo.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_document_section_is_fetched_once() {
        let repo = Arc::new(MockRepository::new());
        let mut fields = Map::new();
        fields.insert("address".into(), Value::from("12 Ring Road"));
        repo.seed_document(Collection::Footer, fields);
        let mut footer = PublicSection::new(repo.clone(), Collection::Footer, 0.2).unwrap();

        let content = footer.load().await.unwrap();
        footer.load().await.unwrap();

        let SectionContent::Document(Some(document)) = content else {
            panic!("expected a document");
        };
        assert_eq!(document.text("address").as_deref(), Some("12 Ring Road"));
        assert_eq!(repo.document_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_sections_show_fallback() {
        let repo = Arc::new(MockRepository::new());
        let mut partners = PublicSection::new(repo.clone(), Collection::Partners, 0.2).unwrap();
        let mut about = PublicSection::new(repo, Collection::AboutUs, 0.2).unwrap();

        assert!(!partners.show_fallback());
        partners.load().await.unwrap();
        about.load().await.unwrap();

        assert!(partners.show_fallback());
        assert!(about.show_fallback());
        assert_eq!(about.content(), Some(SectionContent::Document(None)));
    }

    #[tokio::test]
    async fn test_failed_load_reports_and_retries() {
        let repo = Arc::new(MockRepository::new());
        repo.put_items("*", vec![item("1", "*")]);
        repo.fail_next_lists(1);
        let mut hero = PublicSection::new(repo.clone(), Collection::HeroCarousel, 0.2).unwrap();
        hero.attach();

        assert!(hero.on_visible(1.0).await);
        assert!(!hero.is_loaded());
        assert_eq!(hero.notice().unwrap().failure, Some(FailureKind::Fetch));

        hero.load().await.unwrap();
        assert!(hero.notice().is_none());
        assert_eq!(items(hero.content()).len(), 1);
        assert_eq!(repo.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_about_page_parts_load_independently() {
        let repo = Arc::new(MockRepository::new());
        repo.put_items("*", vec![item("1", "*")]);
        repo.fail_next_documents(1);
        let mut about = AboutPage::new(repo.clone(), 0.2).unwrap();

        assert_eq!(about.load().await, 1);
        assert!(about.intro().notice().is_some());
        assert!(!about.intro().is_loaded());
        assert_eq!(items(about.sections().content()).len(), 1);
        assert_eq!(items(about.partners().content()).len(), 1);

        assert_eq!(about.load().await, 0);
        assert!(about.intro().is_loaded());
        assert_eq!(repo.list_calls(), 2);
        assert_eq!(repo.document_calls(), 2);
    }
}
