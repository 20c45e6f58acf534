//! Configuration service implementation.
//!
//! Loads [`SiteConfig`] from `config.toml` (see [`HprPaths`]), applies
//! environment overrides and caches the result.

use crate::paths::HprPaths;
use hpr_core::config::SiteConfig;
use hpr_core::error::{HprError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

pub const ENV_API_BASE_URL: &str = "HPR_API_BASE_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "HPR_API_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "HPR_PAGE_SIZE";

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config file; the platform default is used when `None`.
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<SiteConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default `config.toml`.
    ///
    /// Nothing is read until the first [`get_config`](Self::get_config).
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `path` instead of the default location.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// The config file this service reads.
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => HprPaths::config_file(),
        }
    }

    /// Gets the configuration, loading it if not cached.
    pub fn get_config(&self) -> Result<SiteConfig> {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let path = self.config_path()?;
        let loaded = load_config(&path, |key| std::env::var(key).ok())?;

        let mut cached = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cached = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cached = None;
    }

    /// Writes `config` to the config file, creating its directory if needed.
    pub fn save_config(&self, config: &SiteConfig) -> Result<PathBuf> {
        config.validate()?;
        let path = self.config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, config.to_toml()?)?;
        tracing::info!(path = %path.display(), "Configuration saved");

        self.invalidate_cache();
        Ok(path)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `path` (defaults when it does not exist), then applies overrides
/// from `env` and validates the result.
pub fn load_config(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<SiteConfig> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            HprError::config(format!("Failed to parse {}: {}", path.display(), e))
        })?
    } else {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        SiteConfig::default()
    };

    apply_env_overrides(&mut config, env)?;
    config.validate()?;
    Ok(config)
}

fn apply_env_overrides(
    config: &mut SiteConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(base_url) = env(ENV_API_BASE_URL) {
        config.api.base_url = base_url;
    }
    if let Some(timeout) = env(ENV_API_TIMEOUT_SECS) {
        config.api.timeout_secs = parse_env(ENV_API_TIMEOUT_SECS, &timeout)?;
    }
    if let Some(page_size) = env(ENV_PAGE_SIZE) {
        config.listing.page_size = parse_env(ENV_PAGE_SIZE, &page_size)?;
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| HprError::config(format!("{} must be a positive integer, got '{}'", key, value)))
}
