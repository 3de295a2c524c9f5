//! Post-assembly pipeline: slug manifest and single-post pages

use crate::content::{to_detail_post, AssembleOptions, PostDetail};
use crate::error::{BlogError, Result};
use crate::richtext::LinkResolver;
use crate::store::{ContentStore, Query, POST_DOCUMENT_TYPE};

/// Page size of the pre-generation manifest query. Repositories with more
/// posts than this are only partially pre-generated; the rest are assembled
/// on first request.
pub const MANIFEST_PAGE_SIZE: u32 = 100;

/// UIDs of up to [`MANIFEST_PAGE_SIZE`] posts, in store order
pub async fn list_all_slugs(store: &dyn ContentStore) -> Result<Vec<String>> {
    let response = store
        .query(&Query::documents_of_type(POST_DOCUMENT_TYPE, MANIFEST_PAGE_SIZE))
        .await?;

    if response.next_page.is_some() {
        tracing::warn!(
            "More than {} posts exist; the rest will only be built on request",
            MANIFEST_PAGE_SIZE
        );
    }

    Ok(response
        .results
        .into_iter()
        .filter_map(|doc| {
            if doc.uid.is_none() {
                tracing::debug!("Skipping post {} without uid", doc.id);
            }
            doc.uid
        })
        .collect())
}

/// Fetch one post by slug and assemble its page
pub async fn assemble_post(
    store: &dyn ContentStore,
    slug: &str,
    options: &AssembleOptions,
    resolver: &dyn LinkResolver,
) -> Result<PostDetail> {
    let doc = store.get_by_uid(POST_DOCUMENT_TYPE, slug).await?;
    let post = to_detail_post(&doc, options, resolver);
    tracing::debug!("Assembled post {} ({} min)", slug, post.reading_time);
    Ok(post)
}

/// What the post page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostView {
    /// Assembly has not finished yet
    Loading,
    Ready(Box<PostDetail>),
    NotFound,
}

impl PostView {
    /// Fold an assembly result into a view; only `NotFound` is absorbed,
    /// every other error is passed on
    pub fn from_result(result: Result<PostDetail>) -> Result<Self> {
        match result {
            Ok(post) => Ok(PostView::Ready(Box::new(post))),
            Err(BlogError::NotFound { .. }) => Ok(PostView::NotFound),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{fixtures, MemoryStore};

    struct PostLinks;

    impl LinkResolver for PostLinks {
        fn resolve(&self, _doc_type: Option<&str>, uid: Option<&str>) -> String {
            format!("/post/{}/", uid.unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_list_all_slugs() {
        let mut docs = fixtures::posts(3);
        docs[1].uid = None;
        let store = MemoryStore::new(docs);

        let slugs = list_all_slugs(&store).await.unwrap();
        assert_eq!(slugs, vec!["post-1", "post-3"]);
    }

    #[tokio::test]
    async fn test_manifest_is_capped() {
        let store = MemoryStore::new(fixtures::posts(105));
        let slugs = list_all_slugs(&store).await.unwrap();
        assert_eq!(slugs.len(), MANIFEST_PAGE_SIZE as usize);
    }

    #[tokio::test]
    async fn test_assemble_post() {
        let doc = fixtures::post("hooks", &["one two three", "four five"]);
        let store = MemoryStore::new(vec![doc]);

        let post = assemble_post(&store, "hooks", &AssembleOptions::default(), &PostLinks)
            .await
            .unwrap();
        assert_eq!(post.slug.as_deref(), Some("hooks"));
        assert_eq!(post.content.len(), 1);
        assert_eq!(post.reading_time, 1);
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let store = MemoryStore::new(fixtures::posts(1));
        let result = assemble_post(&store, "nope", &AssembleOptions::default(), &PostLinks).await;

        assert!(result.as_ref().unwrap_err().is_not_found());
        assert_eq!(PostView::from_result(result).unwrap(), PostView::NotFound);
    }

    #[test]
    fn test_view_passes_on_other_errors() {
        let result = PostView::from_result(Err(BlogError::Network("down".into())));
        assert!(matches!(result, Err(BlogError::Network(_))));
    }
}
