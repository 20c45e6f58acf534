use anyhow::Result;
use serde_json::json;

use super::{Context, print_json};

/// Prints the effective configuration, optionally writing it to disk.
pub fn run(ctx: &Context, init: bool) -> Result<()> {
    let path = ctx.config_service.config_path()?;
    if init {
        let written = ctx.config_service.save_config(&ctx.config)?;
        tracing::info!(path = %written.display(), "Wrote configuration");
    }

    if ctx.json {
        return print_json(&json!({
            "path": path.display().to_string(),
            "config": ctx.config,
        }));
    }
    println!("# {}", path.display());
    print!("{}", ctx.config.to_toml()?);
    Ok(())
}
