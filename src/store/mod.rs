//! Content store client
//!
//! The pipelines only talk to a [`ContentStore`]; the store is built once by
//! the caller and passed in, so the pipelines carry no global client.

mod document;
mod memory;
mod prismic;
mod query;

use async_trait::async_trait;

use crate::error::Result;

pub use document::{ContentGroup, Cursor, Document, ImageField, PostDocumentData, SearchResponse};
pub use memory::MemoryStore;
#[cfg(test)]
pub(crate) use memory::fixtures;
pub use prismic::{PrismicStore, RetryPolicy};
pub use query::{Predicate, Query};

/// Document type of blog posts in the repository
pub const POST_DOCUMENT_TYPE: &str = "posts";

/// Read-only access to a paginated document store
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Run a structured query, returning the first requested page
    async fn query(&self, query: &Query) -> Result<SearchResponse>;

    /// Fetch exactly one document by UID; `BlogError::NotFound` when absent
    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document>;

    /// Follow a cursor returned by an earlier search
    async fn fetch_page(&self, cursor: &Cursor) -> Result<SearchResponse>;
}
