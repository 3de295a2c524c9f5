//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::ContentBlocks;

/// Environment variable that overrides `store.access_token`
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub public_dir: String,
    pub static_dir: String,

    // Date format (date-fns style tokens)
    pub date_format: String,

    pub store: StoreConfig,
    pub listing: ListingConfig,
    pub post: PostConfig,
    pub labels: LabelsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            language: "pt-BR".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            date_format: "dd MMM yyyy".to_string(),

            store: StoreConfig::default(),
            listing: ListingConfig::default(),
            post: PostConfig::default(),
            labels: LabelsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Pick up the access token from the environment when set
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.store.access_token = Some(token);
            }
        }
    }

    /// Reject values the pipelines cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.listing.page_size == 0 {
            anyhow::bail!("listing.page_size must be at least 1");
        }
        if self.post.words_per_minute == 0 {
            anyhow::bail!("post.words_per_minute must be at least 1");
        }
        if self.store.timeout_secs == 0 {
            anyhow::bail!("store.timeout_secs must be at least 1");
        }
        Ok(())
    }
}

/// Content API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// API root, e.g. `https://<repo>.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_token: None,
            timeout_secs: 10,
            max_retries: 2,
            retry_backoff_ms: 200,
        }
    }
}

/// Home page listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub page_size: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page_size: 1 }
    }
}

/// Post page assembly
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    pub content_blocks: ContentBlocks,
    pub words_per_minute: u32,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            content_blocks: ContentBlocks::FirstOnly,
            words_per_minute: 200,
        }
    }
}

/// User-facing strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub load_more: String,
    pub load_error: String,
    pub loading: String,
    pub not_found: String,
    pub minutes: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            load_more: "Carregar mais posts".to_string(),
            load_error: "Não foi possível carregar mais posts. Tente novamente.".to_string(),
            loading: "Carregando...".to_string(),
            not_found: "Post não encontrado".to_string(),
            minutes: "min".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.listing.page_size, 1);
        assert_eq!(config.post.words_per_minute, 200);
        assert_eq!(config.post.content_blocks, ContentBlocks::FirstOnly);
        assert_eq!(config.date_format, "dd MMM yyyy");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
store:
  endpoint: https://myrepo.cdn.prismic.io/api/v2
  timeout_secs: 5
listing:
  page_size: 20
post:
  content_blocks: all
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.store.endpoint, "https://myrepo.cdn.prismic.io/api/v2");
        assert_eq!(config.store.timeout_secs, 5);
        assert_eq!(config.store.max_retries, 2);
        assert_eq!(config.listing.page_size, 20);
        assert_eq!(config.post.content_blocks, ContentBlocks::All);
        assert_eq!(config.post.words_per_minute, 200);
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = SiteConfig::default();
        config.listing.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "title: Loaded\nlanguage: en-US\n").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "Loaded");
        assert_eq!(config.language, "en-US");
    }
}
