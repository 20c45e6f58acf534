use anyhow::Result;
use hpr_application::NewsFeed;
use hpr_core::ItemId;
use serde_json::json;

use super::{Context, print_items, print_json, summarize};

/// Lists the news, or shows one article when `id` is given.
pub async fn run(ctx: &Context, id: Option<String>) -> Result<()> {
    let mut feed = NewsFeed::new(ctx.repository.clone());

    let Some(id) = id else {
        let articles = feed.load().await?;
        if ctx.json {
            return print_json(&json!({
                "banner": feed.banner().map(|banner| banner.to_data_uri()),
                "articles": &*articles,
                "covers": articles.iter().map(|article| article.cover_source()).collect::<Vec<_>>(),
            }));
        }
        if let Some(banner) = feed.banner() {
            println!("Banner: {} ({} bytes)", banner.content_type, banner.bytes.len());
        }
        if articles.is_empty() {
            println!("No news yet.");
        }
        print_items(&articles);
        return Ok(());
    };

    let article = feed.open_article(&ItemId::new(id)).await?;
    if ctx.json {
        return print_json(&json!({
            "article": article,
            "cover": article.cover_source(),
        }));
    }
    println!("{}", summarize(article));
    for (name, value) in &article.fields {
        if let Some(text) = value.as_str() {
            println!("{}: {}", name, text);
        }
    }
    for (index, image) in article.images().iter().enumerate() {
        match image.to_bytes() {
            Ok(bytes) => println!("image {}: {} bytes", index + 1, bytes.len()),
            Err(e) => tracing::warn!("Image {} could not be decoded: {}", index + 1, e),
        }
    }
    Ok(())
}
