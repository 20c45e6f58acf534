use anyhow::{Result, anyhow};
use hpr_application::{AboutPage, PublicSection, SectionContent};
use hpr_core::{Collection, ContentItem};
use serde_json::{Value, json};

use super::{Context, FULLY_VISIBLE, print_json, summarize};

/// Shows any public section: a list or a single document.
pub async fn show(ctx: &Context, collection: Collection) -> Result<()> {
    let mut section = PublicSection::new(
        ctx.repository.clone(),
        collection,
        ctx.config.listing.visibility_threshold,
    )?;
    section.attach();
    section.on_visible(FULLY_VISIBLE).await;

    let Some(content) = section.content() else {
        return Err(match section.notice() {
            Some(notice) => anyhow!(notice.message.clone()),
            None => anyhow!("Failed to load {}", collection),
        });
    };

    if ctx.json {
        return print_json(&content_json(&content));
    }
    for line in content_lines(collection, &content) {
        println!("{}", line);
    }
    Ok(())
}

/// The about page. Parts that fail are reported and the rest still shown.
pub async fn about(ctx: &Context) -> Result<()> {
    let mut page = AboutPage::new(
        ctx.repository.clone(),
        ctx.config.listing.visibility_threshold,
    )?;
    let failed = page.load().await;
    if failed == page.parts().len() {
        return Err(anyhow!("Failed to load the about page"));
    }

    if ctx.json {
        let parts: serde_json::Map<String, Value> = page
            .parts()
            .into_iter()
            .map(|part| {
                let value = part.content().map(|c| content_json(&c)).unwrap_or(Value::Null);
                (part.collection().slug().to_string(), value)
            })
            .collect();
        return print_json(&Value::Object(parts));
    }

    for part in page.parts() {
        println!("== {} ==", part.collection());
        match part.content() {
            Some(content) => {
                for line in content_lines(part.collection(), &content) {
                    println!("{}", line);
                }
            }
            None => {
                if let Some(notice) = part.notice() {
                    eprintln!("{}", notice.message);
                }
            }
        }
        println!();
    }
    Ok(())
}

fn content_json(content: &SectionContent) -> Value {
    match content {
        SectionContent::Items(items) => json!(&**items),
        SectionContent::Document(document) => json!(document),
    }
}

fn content_lines(collection: Collection, content: &SectionContent) -> Vec<String> {
    if content.is_empty() {
        return vec![format!("No {} yet.", collection)];
    }
    match content {
        SectionContent::Items(items) => items.iter().map(summarize).collect(),
        SectionContent::Document(document) => {
            document.as_ref().map(document_lines).unwrap_or_default()
        }
    }
}

fn document_lines(document: &ContentItem) -> Vec<String> {
    let mut lines: Vec<String> = document
        .fields
        .keys()
        .filter_map(|name| document.text(name).map(|text| format!("{}: {}", name, text)))
        .collect();
    if document.cover_source().is_some() {
        lines.push("[image]".to_string());
    }
    lines
}
