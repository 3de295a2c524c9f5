//! Generator module - fetches content and writes the static site
//!
//! Every page is fetched and rendered before anything is written, so a
//! failing store leaves the output directory as it was.

use anyhow::{Context as _, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::content::AssembleOptions;
use crate::helpers::{is_safe_slug, PostLinkResolver};
use crate::pipeline::{self, PostView};
use crate::store::ContentStore;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Summary of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub listing_posts: usize,
    pub has_next_page: bool,
    pub post_pages: usize,
    pub skipped: Vec<String>,
}

/// Static site generator driven by a content store
pub struct Generator<'a> {
    blog: &'a Blog,
    store: &'a dyn ContentStore,
    renderer: TemplateRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(blog: &'a Blog, store: &'a dyn ContentStore) -> Result<Self> {
        let renderer = TemplateRenderer::new(&blog.config)?;
        Ok(Self {
            blog,
            store,
            renderer,
        })
    }

    fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            content_blocks: self.blog.config.post.content_blocks,
            words_per_minute: self.blog.config.post.words_per_minute,
        }
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<GenerateReport> {
        let mut report = GenerateReport::default();
        let mut outputs: Vec<(PathBuf, String)> = Vec::new();

        // Listing page
        let pagination =
            pipeline::fetch_initial_page(self.store, self.blog.config.listing.page_size)
                .await
                .context("Failed to fetch the listing page")?;
        report.listing_posts = pagination.results.len();
        report.has_next_page = pagination.next_page.is_some();
        outputs.push((
            PathBuf::from("index.html"),
            self.renderer.render_index(&pagination)?,
        ));

        // Post pages from the manifest
        let slugs = pipeline::list_all_slugs(self.store)
            .await
            .context("Failed to fetch the post manifest")?;
        tracing::info!("Manifest lists {} posts", slugs.len());

        for slug in slugs {
            if !is_safe_slug(&slug) {
                tracing::warn!("Skipping post with unusable slug {:?}", slug);
                report.skipped.push(slug);
                continue;
            }

            match self.assemble(&slug).await? {
                PostView::Ready(post) => {
                    let html = self.renderer.render_post_view(&PostView::Ready(post))?;
                    outputs.push((post_output_path(&slug), html));
                    report.post_pages += 1;
                }
                PostView::NotFound | PostView::Loading => {
                    tracing::warn!("Post {} vanished between manifest and fetch", slug);
                    report.skipped.push(slug);
                }
            }
        }

        // Not-found page
        outputs.push((
            PathBuf::from("404.html"),
            self.renderer.render_not_found()?,
        ));

        fs::create_dir_all(&self.blog.public_dir)?;
        self.copy_static_assets()?;
        for (relative, html) in outputs {
            self.write_page(&relative, &html)?;
        }

        Ok(report)
    }

    /// Assemble one post into a view; store failures other than a missing
    /// document are errors
    pub async fn assemble(&self, slug: &str) -> Result<PostView> {
        let resolver = PostLinkResolver::new(&self.blog.config);
        let result =
            pipeline::assemble_post(self.store, slug, &self.assemble_options(), &resolver).await;
        PostView::from_result(result).with_context(|| format!("Failed to assemble post {}", slug))
    }

    /// Assemble a post on demand and, when found, persist its page so later
    /// requests are served from disk
    pub async fn generate_post(&self, slug: &str) -> Result<PostView> {
        if !is_safe_slug(slug) {
            return Ok(PostView::NotFound);
        }

        let view = self.assemble(slug).await?;
        if let PostView::Ready(_) = &view {
            let html = self.renderer.render_post_view(&view)?;
            self.write_page(&post_output_path(slug), &html)?;
        }
        Ok(view)
    }

    /// Write a page next to its destination and rename it into place, so
    /// readers never see a partial file
    fn write_page(&self, relative: &Path, html: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        let parent = output_path
            .parent()
            .unwrap_or(self.blog.public_dir.as_path());
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;

        let mut file = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {:?}", parent))?;
        file.write_all(html.as_bytes())
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        file.persist(&output_path)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy static assets (logo, stylesheet, ...) to the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.blog.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest)?;
        }

        Ok(())
    }
}

/// Output file of a post page, relative to the public directory
pub fn post_output_path(slug: &str) -> PathBuf {
    Path::new("post").join(slug).join("index.html")
}
