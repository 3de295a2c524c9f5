//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Blog Configuration

# Site
title: spacetraveling
language: pt-BR

# URL
url: http://localhost:4000
root: /

# Directory
public_dir: public
static_dir: static

# Date format (date-fns tokens)
date_format: dd MMM yyyy

# Content store
store:
  endpoint: https://your-repo.cdn.prismic.io/api/v2
  # access_token may also come from PRISMIC_ACCESS_TOKEN
  access_token:
  timeout_secs: 10
  max_retries: 2
  retry_backoff_ms: 200

# Home page
listing:
  page_size: 1

# Post pages
post:
  # first | all
  content_blocks: first
  words_per_minute: 200

# Labels
labels:
  load_more: Carregar mais posts
  load_error: Não foi possível carregar mais posts. Tente novamente.
  loading: Carregando...
  not_found: Post não encontrado
  minutes: min
"#;

const STYLE_TEMPLATE: &str = r#"* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: #1a1d23; color: #d7d7d7; font-family: Inter, sans-serif; }
.header, .listing, .post-page { max-width: 720px; margin: 0 auto; padding: 2rem 1rem; }
.banner { width: 100%; max-height: 400px; object-fit: cover; }
.post { display: block; color: inherit; text-decoration: none; margin-bottom: 3rem; }
.post h2 { color: #f8f8f8; font-size: 1.75rem; }
.post-info { display: flex; gap: 1.5rem; margin-top: 1.5rem; font-size: 0.875rem; }
.content { margin-top: 4rem; line-height: 1.75; }
.content-heading { color: #f8f8f8; margin-bottom: 2rem; }
.button { background: none; border: 0; color: #ff57b2; font-size: 1.125rem; cursor: pointer; }
.button:disabled { opacity: 0.6; cursor: wait; }
.load-error { color: #ff6b6b; margin-top: 1rem; }
"#;

const LOGO_TEMPLATE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="240" height="26" viewBox="0 0 240 26"><text x="0" y="20" fill="#f8f8f8" font-family="Inter, sans-serif" font-size="22" font-weight="700">spacetraveling<tspan fill="#ff57b2">.</tspan></text></svg>
"##;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let static_dir = target_dir.join("static");
    fs::create_dir_all(&static_dir)?;

    write_if_missing(&target_dir.join("_config.yml"), CONFIG_TEMPLATE)?;
    write_if_missing(&static_dir.join("style.css"), STYLE_TEMPLATE)?;
    write_if_missing(&static_dir.join("Logo.svg"), LOGO_TEMPLATE)?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::info!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::ContentBlocks;

    #[test]
    fn test_init_site_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        assert!(dir.path().join("static/style.css").exists());
        assert!(dir.path().join("static/Logo.svg").exists());

        let config = SiteConfig::load(dir.path().join("_config.yml")).unwrap();
        assert_eq!(config.listing.page_size, 1);
        assert_eq!(config.post.content_blocks, ContentBlocks::FirstOnly);
        assert_eq!(config.labels.load_more, "Carregar mais posts");
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_config.yml"), "title: Mine\n").unwrap();
        init_site(dir.path()).unwrap();

        let content = fs::read_to_string(dir.path().join("_config.yml")).unwrap();
        assert_eq!(content, "title: Mine\n");
    }
}
