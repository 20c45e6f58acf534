use anyhow::{Context as _, Result, anyhow, bail};
use hpr_application::AdminSection;
use hpr_core::{Collection, ContentForm, ItemId, Notice};
use hpr_infrastructure::read_image;
use serde_json::json;
use std::path::PathBuf;

use super::{Context, FULLY_VISIBLE, print_items, print_json, print_notice};

/// Parses a `name=value` form field.
pub fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Opens an admin section and loads it.
async fn open(ctx: &Context, collection: Collection) -> Result<AdminSection> {
    let mut section = AdminSection::new(
        ctx.repository.clone(),
        collection,
        ctx.config.listing.page_size,
        ctx.config.listing.admin_visibility_threshold,
    )?;
    section.attach();
    section.on_visible(FULLY_VISIBLE).await;
    if let Some(notice) = section.take_notice() {
        bail!(notice.message);
    }
    Ok(section)
}

pub async fn list(ctx: &Context, collection: Collection, page: usize) -> Result<()> {
    let mut section = open(ctx, collection).await?;
    section.go_to_page(page);

    if ctx.json {
        return print_json(&json!({
            "collection": collection,
            "page": section.page(),
            "total_pages": section.total_pages(),
            "items": section.page_items(),
        }));
    }

    println!(
        "{} (page {} of {})",
        collection,
        section.page(),
        section.total_pages().max(1)
    );
    if section.items().is_empty() {
        println!("No items yet.");
    }
    print_items(section.page_items());
    Ok(())
}

/// Creates an item, or updates `id` when given.
pub async fn submit(
    ctx: &Context,
    collection: Collection,
    id: Option<String>,
    fields: Vec<(String, String)>,
    image: Option<PathBuf>,
) -> Result<()> {
    let mut section = open(ctx, collection).await?;

    if let Some(id) = id {
        let id = ItemId::new(id);
        let item = section
            .items()
            .iter()
            .find(|item| item.id.as_ref() == Some(&id))
            .cloned()
            .with_context(|| format!("{} has no item '{}'", collection, id))?;
        section.edit(&item);
    }

    let form: &mut ContentForm = section.form_mut();
    for (name, value) in fields {
        form.set(name, value);
    }
    if let Some(path) = image {
        form.image = Some(read_image(&path)?);
    }

    let result = section.submit().await;
    report(ctx, result.map_err(Into::into), section.take_notice())
}

pub async fn delete(ctx: &Context, collection: Collection, id: String) -> Result<()> {
    let mut section = open(ctx, collection).await?;
    let result = section.delete(&ItemId::new(id)).await;
    report(ctx, result.map_err(Into::into), section.take_notice())
}

/// Prints a success notice; failures carry the notice text as the error.
fn report(ctx: &Context, result: Result<()>, notice: Option<Notice>) -> Result<()> {
    if let Err(e) = result {
        return match notice {
            Some(notice) => Err(anyhow!(notice.message)),
            None => Err(e),
        };
    }
    if ctx.json {
        return match notice {
            Some(notice) => print_json(&json!(notice)),
            None => Ok(()),
        };
    }
    print_notice(notice.as_ref());
    Ok(())
}
