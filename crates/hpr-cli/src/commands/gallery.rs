use anyhow::{Result, bail};
use hpr_application::{CategoryBrowser, CategoryCache, ViewPhase};
use hpr_core::{CategoryKey, Collection, ProjectStatus};
use serde_json::json;
use std::sync::Arc;

use super::{Context, FULLY_VISIBLE, print_items, print_json};

/// Gallery page: one category, `pages` pages deep.
pub async fn run(ctx: &Context, status: ProjectStatus, pages: usize) -> Result<()> {
    let cache = Arc::new(CategoryCache::new(ctx.repository.clone(), Collection::Gallery));
    let browser = CategoryBrowser::new(
        cache,
        status.into(),
        ctx.config.listing.page_size,
        ctx.config.listing.visibility_threshold,
    )?;
    show(ctx, browser, status.label(), pages).await
}

/// Home page projects section.
pub async fn projects(ctx: &Context, pages: usize) -> Result<()> {
    let cache = Arc::new(CategoryCache::new(ctx.repository.clone(), Collection::Projects));
    let browser = CategoryBrowser::new(
        cache,
        CategoryKey::all(),
        ctx.config.listing.page_size,
        ctx.config.listing.visibility_threshold,
    )?;
    show(ctx, browser, "Our Projects", pages).await
}

async fn show(ctx: &Context, mut browser: CategoryBrowser, title: &str, pages: usize) -> Result<()> {
    browser.attach();
    if let Some(ticket) = browser.on_visible(FULLY_VISIBLE) {
        let cache = Arc::clone(browser.cache());
        let result = cache.get_or_fetch(ticket.category()).await;
        browser.apply(ticket, result);
    }
    for _ in 1..pages {
        if !browser.load_more() {
            break;
        }
    }

    if browser.phase() == ViewPhase::Failed {
        let message = browser
            .take_notice()
            .map(|notice| notice.message)
            .unwrap_or_else(|| "Failed to load content".to_string());
        bail!(message);
    }

    if ctx.json {
        return print_json(&json!({
            "title": title,
            "category": browser.selected().map(|c| c.as_str()),
            "page": browser.current_page(),
            "has_more": browser.has_more(),
            "items": browser.visible(),
        }));
    }

    println!("{}", title);
    if browser.show_fallback() {
        println!("No projects to show yet.");
        return Ok(());
    }
    print_items(browser.visible());
    if browser.has_more() {
        println!(
            "More available: rerun with --pages {}",
            browser.current_page() + 1
        );
    }
    Ok(())
}
