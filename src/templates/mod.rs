//! Built-in blog templates using the Tera template engine
//!
//! All templates are embedded in the binary. Autoescaping stays on; the
//! rich-text body HTML and the listing state script are the only values
//! marked `safe`.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::{LabelsConfig, SiteConfig};
use crate::content::{Post, PostDetail, PostPagination};
use crate::error::Result;
use crate::helpers::{date_xml, encode_segment, format_date, full_url_for, post_path, url_for};
use crate::pipeline::PostView;

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("loading.html", include_str!("blog/loading.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);
        tera.register_filter("reading_time", reading_time_filter);

        Ok(Self {
            tera,
            site: SiteData::from_config(config),
        })
    }

    /// Listing page with the first page of posts and the load-more state
    pub fn render_index(&self, pagination: &PostPagination) -> Result<String> {
        let posts: Vec<PostCard> = pagination
            .results
            .iter()
            .map(|p| PostCard::new(p, &self.site))
            .collect();

        let state = ListingState {
            next_page: pagination.next_page.as_ref().map(|c| c.as_str()),
            post_base: url_for(&self.site.config, "post/"),
        };

        let mut context = self.base_context();
        context.insert("posts", &posts);
        context.insert("has_next", &pagination.next_page.is_some());
        context.insert("listing_state", &script_json(&state)?);
        Ok(self.tera.render("index.html", &context)?)
    }

    /// Post page for any state of assembly
    pub fn render_post_view(&self, view: &PostView) -> Result<String> {
        match view {
            PostView::Loading => self.render_loading(),
            PostView::Ready(post) => self.render_post(post),
            PostView::NotFound => self.render_not_found(),
        }
    }

    fn render_post(&self, post: &PostDetail) -> Result<String> {
        let mut context = self.base_context();
        context.insert("post", post);
        context.insert("page_title", &post.title);
        context.insert("date_iso", &date_xml(post.first_publication_date.as_deref()));
        if let Some(slug) = &post.slug {
            let path = format!("post/{}/", encode_segment(slug));
            context.insert("canonical_url", &full_url_for(&self.site.config, &path));
        }
        Ok(self.tera.render("post.html", &context)?)
    }

    fn render_loading(&self) -> Result<String> {
        let mut context = self.base_context();
        context.insert("page_title", &self.site.labels.loading);
        Ok(self.tera.render("loading.html", &context)?)
    }

    pub fn render_not_found(&self) -> Result<String> {
        let mut context = self.base_context();
        context.insert("page_title", &self.site.labels.not_found);
        Ok(self.tera.render("not_found.html", &context)?)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert("page_title", "");
        context.insert("canonical_url", "");
        context.insert("home_url", &url_for(&self.site.config, "/"));
        context.insert("style_url", &url_for(&self.site.config, "style.css"));
        context.insert("logo_url", &url_for(&self.site.config, "Logo.svg"));
        context
    }
}

/// Serialize for embedding inside `<script type="application/json">`
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)
        .map_err(|e| crate::error::BlogError::malformed(e.to_string()))?;
    Ok(json.replace("</", "<\\/"))
}

/// Tera filter: format a store timestamp with a date-fns pattern
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let timestamp = value.as_str();
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "dd MMM yyyy".to_string(),
    };
    let locale = match args.get("locale") {
        Some(val) => tera::try_get_value!("date_format", "locale", String, val),
        None => "pt-BR".to_string(),
    };

    Ok(tera::Value::String(format_date(timestamp, &format, &locale)))
}

/// Tera filter: `4 | reading_time(unit="min")` -> `4 min`
fn reading_time_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let minutes = tera::try_get_value!("reading_time", "value", u64, value);
    let unit = match args.get("unit") {
        Some(val) => tera::try_get_value!("reading_time", "unit", String, val),
        None => "min".to_string(),
    };
    Ok(tera::Value::String(format!("{} {}", minutes, unit)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub language: String,
    pub date_format: String,
    pub labels: LabelsConfig,
    #[serde(skip)]
    config: SiteConfig,
}

impl SiteData {
    fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            language: config.language.clone(),
            date_format: config.date_format.clone(),
            labels: config.labels.clone(),
            config: config.clone(),
        }
    }
}

/// A listing entry ready for display
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub path: Option<String>,
}

impl PostCard {
    fn new(post: &Post, site: &SiteData) -> Self {
        Self {
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            date: format_date(
                post.first_publication_date.as_deref(),
                &site.date_format,
                &site.language,
            ),
            path: post.slug.as_deref().map(|slug| post_path(&site.config, slug)),
        }
    }
}

/// Client-side state of the load-more control
#[derive(Debug, Clone, Serialize)]
struct ListingState<'a> {
    next_page: Option<&'a str>,
    post_base: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Banner, BodyHtml, ContentSection};
    use crate::store::Cursor;

    fn renderer() -> TemplateRenderer {
        TemplateRenderer::new(&SiteConfig::default()).unwrap()
    }

    fn listing_post(slug: &str) -> Post {
        Post {
            slug: Some(slug.to_string()),
            first_publication_date: Some("2021-03-25T19:25:28+0000".to_string()),
            title: format!("Title <{}>", slug),
            subtitle: "Sub".to_string(),
            author: "Danilo Vieira".to_string(),
        }
    }

    fn detail_post() -> PostDetail {
        PostDetail {
            slug: Some("hooks".to_string()),
            first_publication_date: Some("2021-03-25T19:25:28+0000".to_string()),
            title: "Como utilizar Hooks".to_string(),
            subtitle: "Sub".to_string(),
            author: "Joseph Oliveira".to_string(),
            banner: Banner {
                url: "https://images.example.com/banner.png".to_string(),
            },
            content: vec![ContentSection {
                heading: "Proin et varius".to_string(),
                body: vec![BodyHtml {
                    text: "<p>Lorem <strong>ipsum</strong></p>".to_string(),
                }],
            }],
            reading_time: 4,
        }
    }

    #[test]
    fn test_index_with_next_page() {
        let html = renderer()
            .render_index(&PostPagination {
                next_page: Some(Cursor::new("https://repo.cdn.prismic.io/search?page=2")),
                results: vec![listing_post("hooks")],
            })
            .unwrap();

        assert!(html.contains(r#"href="/post/hooks/""#));
        assert!(html.contains("Title &lt;hooks&gt;"));
        assert!(html.contains("25 mar 2021"));
        assert!(html.contains("Carregar mais posts"));
        assert!(html.contains("https://repo.cdn.prismic.io/search?page=2"));
    }

    #[test]
    fn test_index_without_next_page_has_no_button() {
        let html = renderer()
            .render_index(&PostPagination {
                next_page: None,
                results: vec![listing_post("hooks")],
            })
            .unwrap();
        assert!(!html.contains(r#"id="load-more""#));
    }

    #[test]
    fn test_post_body_is_injected_verbatim() {
        let html = renderer()
            .render_post_view(&PostView::Ready(Box::new(detail_post())))
            .unwrap();

        assert!(html.contains("<p>Lorem <strong>ipsum</strong></p>"));
        assert!(html.contains("Proin et varius"));
        assert!(html.contains("4 min"));
        assert!(html.contains("banner.png"));
        assert!(html.contains(r#"rel="canonical" href="http://localhost:4000/post/hooks/""#));
    }

    #[test]
    fn test_loading_and_not_found_views() {
        let loading = renderer().render_post_view(&PostView::Loading).unwrap();
        assert!(loading.contains("Carregando..."));

        let missing = renderer().render_post_view(&PostView::NotFound).unwrap();
        assert!(missing.contains("Post não encontrado"));
    }

    #[test]
    fn test_reading_time_filter() {
        let mut args = HashMap::new();
        args.insert("unit".to_string(), tera::Value::from("minutos"));
        let value = reading_time_filter(&tera::Value::from(0u32), &args).unwrap();
        assert_eq!(value, tera::Value::from("0 minutos"));
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let json = script_json(&serde_json::json!({"a": "</script>"})).unwrap();
        assert!(!json.contains("</script>"));
    }
}
