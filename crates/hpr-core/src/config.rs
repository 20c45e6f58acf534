//! Client configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

use crate::error::{HprError, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: usize = 6;
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.25;
pub const DEFAULT_ADMIN_VISIBILITY_THRESHOLD: f64 = 0.3;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Backend connection settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Listing view settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ListingConfig {
    /// Items added per "load more".
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Visible fraction that triggers the first fetch of a public section.
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f64,
    /// Visible fraction that triggers the first fetch of an admin section.
    #[serde(default = "default_admin_visibility_threshold")]
    pub admin_visibility_threshold: f64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_visibility_threshold() -> f64 {
    DEFAULT_VISIBILITY_THRESHOLD
}

fn default_admin_visibility_threshold() -> f64 {
    DEFAULT_ADMIN_VISIBILITY_THRESHOLD
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            visibility_threshold: default_visibility_threshold(),
            admin_visibility_threshold: default_admin_visibility_threshold(),
        }
    }
}

impl SiteConfig {
    /// Rejects values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let base = self.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(HprError::config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(HprError::config("api.timeout_secs must be positive"));
        }
        if self.listing.page_size == 0 {
            return Err(HprError::config("listing.page_size must be positive"));
        }
        for (name, value) in [
            ("listing.visibility_threshold", self.listing.visibility_threshold),
            (
                "listing.admin_visibility_threshold",
                self.listing.admin_visibility_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(HprError::config(format!(
                    "{} must be within 0.0..=1.0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Renders the config as `config.toml` content.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.listing.page_size, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: SiteConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://hprinfra.example/api/v1"

            [listing]
            page_size = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://hprinfra.example/api/v1");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.listing.page_size, 9);
        assert_eq!(config.listing.visibility_threshold, 0.25);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SiteConfig::default();
        config.listing.page_size = 0;
        assert!(config.validate().unwrap_err().is_config());

        let mut config = SiteConfig::default();
        config.listing.visibility_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.api.base_url = "localhost:5000".to_string();
        assert!(config.validate().is_err());
    }
}
