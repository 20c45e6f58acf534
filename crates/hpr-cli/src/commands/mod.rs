pub mod admin;
pub mod config;
pub mod gallery;
pub mod mission;
pub mod news;
pub mod section;

use anyhow::Result;
use hpr_core::config::SiteConfig;
use hpr_core::{ContentItem, ContentRepository, Notice, NoticeLevel};
use hpr_infrastructure::{ConfigService, HttpContentRepository};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// The terminal plays the viewport: sections are always fully on screen.
pub const FULLY_VISIBLE: f64 = 1.0;

/// Shared state for every command.
pub struct Context {
    pub config_service: ConfigService,
    pub config: SiteConfig,
    pub repository: Arc<dyn ContentRepository>,
    pub json: bool,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>, json: bool) -> Result<Self> {
        let config_service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new(),
        };
        let config = config_service.get_config()?;
        tracing::debug!(base_url = %config.api.base_url, "Using backend");

        Ok(Self {
            repository: Arc::new(HttpContentRepository::from_config(&config.api)),
            config_service,
            config,
            json,
        })
    }
}

/// One line per item: id, headline and the first date-like field.
pub fn summarize(item: &ContentItem) -> String {
    let id = item.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
    let headline = item
        .headline()
        .or_else(|| item.text("description"))
        .unwrap_or_default();
    let mut line = format!("[{}] {}", id, headline);
    if let Some(date) = item.date("work_date").or_else(|| item.date("date")) {
        line.push_str(&format!(" ({})", date));
    }
    let images = item.images().len();
    if images > 0 {
        line.push_str(&format!(" [{} images]", images));
    } else if item.image.is_some() {
        line.push_str(" [image]");
    }
    line
}

pub fn print_items(items: &[ContentItem]) {
    for item in items {
        println!("{}", summarize(item));
    }
}

pub fn print_notice(notice: Option<&Notice>) {
    if let Some(notice) = notice {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("{}", notice.message),
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_marks_images() {
        let plain = ContentItem::new("1").with_field("title", "Depot");
        assert_eq!(summarize(&plain), "[1] Depot");

        let article: ContentItem = serde_json::from_value(json!({
            "id": 4,
            "title": "Bridge opened",
            "date": "2024-03-01",
            "images": [
                { "image_blob": { "type": "Buffer", "data": [1, 2] } },
                { "image_blob": { "type": "Buffer", "data": [3] } }
            ]
        }))
        .unwrap();
        assert_eq!(summarize(&article), "[4] Bridge opened (2024-03-01) [2 images]");
    }
}
