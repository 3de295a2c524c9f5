//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;
use crate::richtext::LinkResolver;
use crate::store::POST_DOCUMENT_TYPE;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'\'')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Site path of a post page: `/post/{slug}/`
pub fn post_path(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &format!("post/{}/", encode_segment(slug)))
}

/// Percent-encode a single path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Whether a slug can be used as an output directory name
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\'])
        && !slug.chars().any(|c| c.is_control())
}

/// Resolves document links inside rich text to post pages
pub struct PostLinkResolver<'a> {
    config: &'a SiteConfig,
}

impl<'a> PostLinkResolver<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }
}

impl LinkResolver for PostLinkResolver<'_> {
    fn resolve(&self, doc_type: Option<&str>, uid: Option<&str>) -> String {
        match (doc_type, uid) {
            (Some(POST_DOCUMENT_TYPE), Some(uid)) => post_path(self.config, uid),
            _ => url_for(self.config, "/"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.root = "/blog/".to_string();
        config.url = "https://example.com".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/blog/css/style.css");
        assert_eq!(url_for(&config, ""), "/blog/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(full_url_for(&config, "/about/"), "https://example.com/blog/about/");
    }

    #[test]
    fn test_post_path_encodes_slug() {
        let config = SiteConfig::default();
        assert_eq!(post_path(&config, "como-utilizar-hooks"), "/post/como-utilizar-hooks/");
        assert_eq!(post_path(&config, "a b?"), "/post/a%20b%3F/");
    }

    #[test]
    fn test_safe_slug() {
        assert!(is_safe_slug("criando-um-app-cra-do-zero"));
        assert!(!is_safe_slug(".."));
        assert!(!is_safe_slug("a/b"));
        assert!(!is_safe_slug(""));
    }

    #[test]
    fn test_link_resolver() {
        let config = SiteConfig::default();
        let resolver = PostLinkResolver::new(&config);
        assert_eq!(resolver.resolve(Some("posts"), Some("hello")), "/post/hello/");
        assert_eq!(resolver.resolve(Some("page"), Some("about")), "/");
    }
}
