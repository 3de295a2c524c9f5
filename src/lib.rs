//! prismic-blog: a headless-CMS blog renderer
//!
//! Posts live in a remote document store. This crate fetches them through a
//! [`store::ContentStore`], shapes them for display in the listing and
//! post-assembly pipelines, and renders them with embedded Tera templates
//! into a static site, with request-time fallback for posts that were not
//! pre-generated.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod pipeline;
pub mod richtext;
pub mod server;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use store::{ContentStore, MemoryStore, PrismicStore};

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Static assets copied verbatim into the output
    pub static_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            let mut config = config::SiteConfig::default();
            config.apply_env();
            config
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog with an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            public_dir,
            static_dir,
        }
    }

    /// Build the content store: the JSON fixture when given, otherwise the
    /// remote API configured under `store:`
    pub fn store(&self, fixture: Option<&Path>) -> Result<Arc<dyn ContentStore>> {
        match fixture {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.base_dir.join(path)
                };
                Ok(Arc::new(MemoryStore::from_fixture(path)?))
            }
            None => Ok(Arc::new(PrismicStore::new(&self.config.store)?)),
        }
    }

    /// Generate the static site
    pub async fn generate(&self, store: &dyn ContentStore) -> Result<()> {
        commands::generate::run(self, store).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_new_without_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "spacetraveling");
        assert_eq!(blog.public_dir, dir.path().join("public"));
        assert_eq!(blog.static_dir, dir.path().join("static"));
    }

    #[test]
    fn test_new_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_config.yml"), "public_dir: out\n").unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.public_dir, dir.path().join("out"));
    }

    #[test]
    fn test_store_from_relative_fixture() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("posts.json"), "[]").unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(blog.store(Some(Path::new("posts.json"))).is_ok());
    }

    #[test]
    fn test_store_without_endpoint_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(blog.store(None).is_err());
    }
}
