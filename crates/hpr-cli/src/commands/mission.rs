use anyhow::{Result, anyhow};
use hpr_application::DocumentSection;
use hpr_core::{Collection, ContentForm};
use serde_json::json;

use super::{Context, print_json, print_notice};

pub async fn show(ctx: &Context) -> Result<()> {
    let mut section = DocumentSection::new(ctx.repository.clone(), Collection::MissionStatement)?;
    section.load().await?;

    if ctx.json {
        return print_json(&json!(section.fields()));
    }
    if section.fields().is_empty() {
        println!("No mission statement yet.");
        return Ok(());
    }
    println!("{}", section.field("heading").unwrap_or_default());
    println!();
    println!("{}", section.field("description").unwrap_or_default());
    Ok(())
}

pub async fn set(ctx: &Context, heading: String, description: String) -> Result<()> {
    let mut section = DocumentSection::new(ctx.repository.clone(), Collection::MissionStatement)?;
    let form = ContentForm::new()
        .with_field("heading", heading)
        .with_field("description", description);

    if let Err(e) = section.save(&form).await {
        return Err(match section.notice() {
            Some(notice) => anyhow!(notice.message.clone()),
            None => e.into(),
        });
    }
    print_notice(section.notice());
    Ok(())
}
