//! List site content

use anyhow::Result;

use crate::helpers::format_date;
use crate::pipeline::{self, ListingSession};
use crate::store::ContentStore;
use crate::Blog;

/// List site content by type
pub async fn run(blog: &Blog, store: &dyn ContentStore, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let initial =
                pipeline::fetch_initial_page(store, blog.config.listing.page_size).await?;
            let mut session = ListingSession::new(initial);
            session.load_all(store).await?;

            let posts = session.into_posts();
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    format_date(
                        post.first_publication_date.as_deref(),
                        &blog.config.date_format,
                        &blog.config.language
                    ),
                    post.title,
                    post.slug.as_deref().unwrap_or("-")
                );
            }
        }
        "slug" | "slugs" => {
            let slugs = pipeline::list_all_slugs(store).await?;
            println!("Slugs ({}):", slugs.len());
            for slug in slugs {
                println!("  {}", slug);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: posts, slugs", content_type);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{fixtures, MemoryStore};

    #[tokio::test]
    async fn test_list_known_types() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let store = MemoryStore::new(fixtures::posts(3));

        run(&blog, &store, "posts").await.unwrap();
        run(&blog, &store, "slugs").await.unwrap();
        // one initial page, two cursor follows, one manifest query
        assert_eq!(store.requests(), 4);
    }

    #[tokio::test]
    async fn test_list_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let store = MemoryStore::new(Vec::new());
        assert!(run(&blog, &store, "tags").await.is_err());
    }
}
