//! Path management for HPR configuration files.
//!
//! ```text
//! ~/.config/hpr/          # Config directory (platform config dir + "hpr")
//! └── config.toml         # Client configuration
//! ```

use hpr_core::error::{HprError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "hpr";
const CONFIG_FILE: &str = "config.toml";

/// Resolves the platform-specific locations used by the client.
pub struct HprPaths;

impl HprPaths {
    /// Returns the HPR configuration directory (e.g. `~/.config/hpr/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| HprError::config("Cannot find the user configuration directory"))
    }

    /// Returns the path of `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_lives_in_app_dir() {
        // Headless CI containers may have no config dir at all.
        if let Ok(path) = HprPaths::config_file() {
            assert!(path.ends_with("hpr/config.toml"));
        }
    }
}
