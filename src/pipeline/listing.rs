//! Listing pipeline: first page at build time, cursor pages on request

use crate::content::{to_listing_post, NextPage, Post, PostPagination};
use crate::error::Result;
use crate::store::{ContentStore, Cursor, Query, POST_DOCUMENT_TYPE};

/// Fetch the first page of posts in store order
pub async fn fetch_initial_page(store: &dyn ContentStore, page_size: u32) -> Result<PostPagination> {
    let response = store
        .query(&Query::documents_of_type(POST_DOCUMENT_TYPE, page_size))
        .await?;

    tracing::debug!(
        "Fetched {} posts for the listing (next page: {})",
        response.results.len(),
        response.next_page.is_some()
    );

    Ok(PostPagination {
        next_page: response.next_page,
        results: response.results.iter().map(to_listing_post).collect(),
    })
}

/// Follow a cursor from an earlier page and map its documents the same way
pub async fn fetch_next_page(store: &dyn ContentStore, cursor: &Cursor) -> Result<NextPage> {
    let response = store.fetch_page(cursor).await?;

    Ok(NextPage {
        next_page: response.next_page,
        posts: response.results.iter().map(to_listing_post).collect(),
    })
}

/// Browsing state of the listing page.
///
/// Posts are only ever appended, in arrival order and without dedup. The
/// cursor is replaced by every completed load; once it is `None` no load can
/// start. At most one load is in flight.
#[derive(Debug, Clone, Default)]
pub struct ListingSession {
    posts: Vec<Post>,
    cursor: Option<Cursor>,
    in_flight: bool,
    last_error: Option<String>,
}

impl ListingSession {
    pub fn new(initial: PostPagination) -> Self {
        Self {
            posts: initial.results,
            cursor: initial.next_page,
            in_flight: false,
            last_error: None,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Message of the last failed load, cleared by the next successful one
    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the "load more" control should be enabled
    pub fn can_load_more(&self) -> bool {
        self.cursor.is_some() && !self.in_flight
    }

    /// Claim the next load. Returns `None` when exhausted or already loading.
    pub fn begin_load(&mut self) -> Option<Cursor> {
        if !self.can_load_more() {
            return None;
        }
        self.in_flight = true;
        self.cursor.clone()
    }

    /// Apply the outcome of a load started with [`begin_load`].
    ///
    /// On failure the posts and cursor are left as they were so the same
    /// load can be retried.
    ///
    /// [`begin_load`]: ListingSession::begin_load
    pub fn finish_load(&mut self, result: Result<NextPage>) -> Result<usize> {
        self.in_flight = false;
        match result {
            Ok(page) => {
                let appended = page.posts.len();
                self.posts.extend(page.posts);
                self.cursor = page.next_page;
                self.last_error = None;
                Ok(appended)
            }
            Err(e) => {
                tracing::warn!("Failed to load more posts: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Load the next page if one is available; returns how many posts were
    /// appended (0 when nothing was fetched)
    pub async fn load_more(&mut self, store: &dyn ContentStore) -> Result<usize> {
        let Some(cursor) = self.begin_load() else {
            return Ok(0);
        };
        let result = fetch_next_page(store, &cursor).await;
        self.finish_load(result)
    }

    /// Keep loading until the cursor runs out
    pub async fn load_all(&mut self, store: &dyn ContentStore) -> Result<()> {
        while self.cursor.is_some() {
            self.load_more(store).await?;
        }
        Ok(())
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlogError;
    use crate::store::{fixtures, MemoryStore};

    #[tokio::test]
    async fn test_initial_page_uses_page_size() {
        let store = MemoryStore::new(fixtures::posts(3));
        let page = fetch_initial_page(&store, 1).await.unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].slug.as_deref(), Some("post-1"));
        assert!(page.next_page.is_some());
    }

    #[tokio::test]
    async fn test_load_more_appends_in_order() {
        let store = MemoryStore::new(fixtures::posts(3));
        let mut session = ListingSession::new(fetch_initial_page(&store, 1).await.unwrap());

        assert_eq!(session.load_more(&store).await.unwrap(), 1);
        assert_eq!(session.posts().len(), 2);
        assert_eq!(session.load_more(&store).await.unwrap(), 1);

        let slugs: Vec<_> = session
            .posts()
            .iter()
            .map(|p| p.slug.clone().unwrap())
            .collect();
        assert_eq!(slugs, vec!["post-1", "post-2", "post-3"]);
        assert!(session.cursor().is_none());
        assert!(!session.can_load_more());
    }

    #[tokio::test]
    async fn test_no_fetch_after_cursor_is_exhausted() {
        let store = MemoryStore::new(fixtures::posts(2));
        let mut session = ListingSession::new(fetch_initial_page(&store, 2).await.unwrap());
        assert!(session.cursor().is_none());

        let before = store.requests();
        assert_eq!(session.load_more(&store).await.unwrap(), 0);
        assert_eq!(store.requests(), before);
    }

    #[tokio::test]
    async fn test_repeated_documents_are_not_deduplicated() {
        let mut docs = fixtures::posts(2);
        docs.push(docs[0].clone());
        let store = MemoryStore::new(docs);

        let mut session = ListingSession::new(fetch_initial_page(&store, 1).await.unwrap());
        session.load_all(&store).await.unwrap();

        assert_eq!(session.posts().len(), 3);
        assert_eq!(session.posts()[0], session.posts()[2]);
    }

    #[test]
    fn test_only_one_load_in_flight() {
        let mut session = ListingSession::new(PostPagination {
            next_page: Some(Cursor::new("memory://search?type=posts&page=2&pageSize=1")),
            results: Vec::new(),
        });

        assert!(session.begin_load().is_some());
        assert!(session.is_loading());
        assert!(session.begin_load().is_none());
    }

    #[test]
    fn test_failed_load_is_retryable() {
        let cursor = Cursor::new("memory://search?type=posts&page=2&pageSize=1");
        let mut session = ListingSession::new(PostPagination {
            next_page: Some(cursor.clone()),
            results: Vec::new(),
        });

        session.begin_load();
        let result = session.finish_load(Err(BlogError::Network("connection reset".into())));
        assert!(result.is_err());
        assert_eq!(session.cursor(), Some(&cursor));
        assert!(session.error().unwrap().contains("connection reset"));
        assert!(session.can_load_more());

        assert_eq!(session.begin_load(), Some(cursor));
        session
            .finish_load(Ok(NextPage {
                next_page: None,
                posts: Vec::new(),
            }))
            .unwrap();
        assert!(session.error().is_none());
        assert!(!session.can_load_more());
    }

    #[tokio::test]
    async fn test_length_is_sum_of_page_sizes() {
        let store = MemoryStore::new(fixtures::posts(7));
        let initial = fetch_initial_page(&store, 3).await.unwrap();
        let mut expected = initial.results.len();
        let mut session = ListingSession::new(initial);

        while session.can_load_more() {
            expected += session.load_more(&store).await.unwrap();
            assert_eq!(session.posts().len(), expected);
        }
        assert_eq!(expected, 7);
    }
}
