//! News page view model.

use hpr_core::error::Result;
use hpr_core::{
    BinaryImage, CategoryKey, Collection, ContentItem, ContentRepository, FailureKind, ItemId,
    Notice,
};
use std::sync::Arc;

use crate::cache::{CategoryCache, OnceMap};

/// The news list, its banner and the article reader.
///
/// The list is fetched once per feed; articles are fetched on first open and
/// served from memory afterwards.
pub struct NewsFeed {
    repository: Arc<dyn ContentRepository>,
    articles: CategoryCache,
    details: OnceMap<ItemId, ContentItem>,
    banner: Option<BinaryImage>,
    banner_requested: bool,
    open: Option<ContentItem>,
    notice: Option<Notice>,
}

impl NewsFeed {
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self {
            articles: CategoryCache::new(repository.clone(), Collection::News),
            repository,
            details: OnceMap::new(),
            banner: None,
            banner_requested: false,
            open: None,
            notice: None,
        }
    }

    /// Loads the article list and the banner.
    ///
    /// A missing banner is not an error; the page renders without it. The
    /// banner is requested once per feed, whatever the outcome.
    pub async fn load(&mut self) -> Result<Arc<[ContentItem]>> {
        let articles = match self.articles.get_or_fetch(&CategoryKey::all()).await {
            Ok(articles) => articles,
            Err(e) => {
                self.notice = Some(Notice::from_error(FailureKind::Fetch, "Failed to load news", &e));
                return Err(e);
            }
        };

        if !self.banner_requested {
            self.banner_requested = true;
            match self.repository.banner().await {
                Ok(banner) => self.banner = Some(banner),
                Err(e) => tracing::warn!("Failed to load news banner: {}", e),
            }
        }
        Ok(articles)
    }

    /// The article list, if loaded.
    pub fn articles(&self) -> Option<Arc<[ContentItem]>> {
        self.articles.peek(&CategoryKey::all())
    }

    pub fn banner(&self) -> Option<&BinaryImage> {
        self.banner.as_ref()
    }

    /// Opens an article, fetching it only the first time.
    pub async fn open_article(&mut self, id: &ItemId) -> Result<&ContentItem> {
        let repository = Arc::clone(&self.repository);
        let key = id.clone();
        let article = self
            .details
            .get_or_try_init(id, move || async move { repository.get(Collection::News, &key).await })
            .await;

        match article {
            Ok(article) => Ok(&*self.open.insert(article)),
            Err(e) => {
                tracing::warn!(id = %id, "Failed to open article: {}", e);
                self.notice = Some(Notice::from_error(FailureKind::Fetch, "Failed to open article", &e));
                Err(e)
            }
        }
    }

    pub fn open(&self) -> Option<&ContentItem> {
        self.open.as_ref()
    }

    pub fn close_article(&mut self) {
        self.open = None;
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockRepository, item};

    #[tokio::test]
    async fn test_list_and_banner_load_once() {
        let repo = Arc::new(MockRepository::new());
        repo.put_items("*", vec![item("1", "*"), item("2", "*")]);
        let mut feed = NewsFeed::new(repo.clone());

        assert!(feed.articles().is_none());
        assert_eq!(feed.load().await.unwrap().len(), 2);
        feed.load().await.unwrap();

        assert_eq!(repo.list_calls(), 1);
        assert_eq!(repo.banner_calls(), 1);
        assert_eq!(feed.banner().unwrap().content_type, "image/png");
        assert_eq!(feed.articles().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_banner_is_not_requested_again() {
        let repo = Arc::new(MockRepository::new());
        repo.put_items("*", vec![item("1", "*")]);
        repo.fail_next_banners(1);
        let mut feed = NewsFeed::new(repo.clone());

        feed.load().await.unwrap();
        feed.load().await.unwrap();
        feed.load().await.unwrap();

        assert!(feed.banner().is_none());
        assert_eq!(repo.banner_calls(), 1);
        assert!(feed.notice().is_none());
    }

    #[tokio::test]
    async fn test_reopening_an_article_uses_the_cache() {
        let repo = Arc::new(MockRepository::new());
        repo.put_items("*", vec![item("7", "*")]);
        let mut feed = NewsFeed::new(repo.clone());
        let id = ItemId::new("7");

        let title = feed.open_article(&id).await.unwrap().headline();
        assert_eq!(title.as_deref(), Some("Item 7"));
        feed.close_article();
        assert!(feed.open().is_none());

        feed.open_article(&id).await.unwrap();
        assert_eq!(repo.get_calls(), 1);
        assert!(feed.open().is_some());
    }

    #[tokio::test]
    async fn test_missing_article_reports_and_is_retried() {
        let repo = Arc::new(MockRepository::new());
        let mut feed = NewsFeed::new(repo.clone());
        let id = ItemId::new("404");

        assert!(feed.open_article(&id).await.unwrap_err().is_not_found());
        assert!(feed.notice().unwrap().is_error());
        assert!(feed.open().is_none());

        repo.put_items("*", vec![item("404", "*")]);
        assert!(feed.open_article(&id).await.is_ok());
        assert_eq!(repo.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_list_failure_sets_notice() {
        let repo = Arc::new(MockRepository::new());
        repo.fail_next_lists(1);
        let mut feed = NewsFeed::new(repo.clone());

        assert!(feed.load().await.is_err());
        assert_eq!(feed.notice().unwrap().failure, Some(FailureKind::Fetch));
        assert_eq!(repo.banner_calls(), 0);
    }
}
