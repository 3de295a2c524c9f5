//! In-memory store backed by a fixed list of documents
//!
//! Used for offline generation (`--fixture posts.json`) and as the fake store
//! in tests. Cursors look like `memory://search?type=posts&page=2&pageSize=1`.

use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

use super::{ContentStore, Cursor, Document, Predicate, Query, SearchResponse};
use crate::error::{BlogError, Result};

/// Paginating store over an owned document list
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Vec<Document>,
    requests: AtomicUsize,
}

impl MemoryStore {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            requests: AtomicUsize::new(0),
        }
    }

    /// Load documents from a JSON file holding either an array of documents
    /// or a search response (`{"results": [...]}`)
    pub fn from_fixture<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| BlogError::io(path, e))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| BlogError::malformed(format!("{}: {}", path.display(), e)))?;

        let documents: Vec<Document> = match value {
            serde_json::Value::Object(mut map) if map.contains_key("results") => {
                let results = map.remove("results").unwrap_or_default();
                serde_json::from_value(results)
            }
            other => serde_json::from_value(other),
        }
        .map_err(|e| BlogError::malformed(format!("{}: {}", path.display(), e)))?;

        let store = Self::new(documents);
        tracing::info!("Loaded {} documents from {:?}", store.documents.len(), path);
        Ok(store)
    }

    /// Number of store calls served so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn matches(doc: &Document, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::DocumentType(doc_type) => &doc.doc_type == doc_type,
            Predicate::Uid { doc_type, uid } => {
                &doc.doc_type == doc_type && doc.uid.as_deref() == Some(uid.as_str())
            }
        }
    }

    fn search(&self, query: &Query) -> SearchResponse {
        let matching: Vec<&Document> = self
            .documents
            .iter()
            .filter(|doc| query.predicates.iter().all(|p| Self::matches(doc, p)))
            .collect();

        let page_size = query.page_size.max(1) as usize;
        let page = query.page.max(1) as usize;
        let total = matching.len();
        let total_pages = total.div_ceil(page_size);
        let start = ((page - 1) * page_size).min(total);
        let end = (start + page_size).min(total);

        let results: Vec<Document> = matching[start..end].iter().map(|d| (*d).clone()).collect();

        let type_filter = query.predicates.iter().find_map(|p| match p {
            Predicate::DocumentType(t) => Some(t.as_str()),
            Predicate::Uid { .. } => None,
        });

        let cursor_for = |page: usize| {
            type_filter.map(|t| {
                Cursor::new(format!(
                    "memory://search?type={}&page={}&pageSize={}",
                    t, page, page_size
                ))
            })
        };

        SearchResponse {
            page: page as u32,
            results_per_page: page_size as u32,
            results_size: results.len() as u32,
            total_results_size: total as u32,
            total_pages: total_pages as u32,
            next_page: if page < total_pages {
                cursor_for(page + 1)
            } else {
                None
            },
            prev_page: if page > 1 && total > 0 {
                cursor_for(page - 1)
            } else {
                None
            },
            results,
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn query(&self, query: &Query) -> Result<SearchResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.search(query))
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.search(&Query::by_uid(doc_type, uid))
            .results
            .into_iter()
            .next()
            .ok_or_else(|| BlogError::not_found(doc_type, uid))
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<SearchResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let url = Url::parse(cursor.as_str())
            .map_err(|e| BlogError::malformed(format!("bad cursor {}: {}", cursor, e)))?;
        if url.scheme() != "memory" {
            return Err(BlogError::malformed(format!("not a memory cursor: {}", cursor)));
        }

        let mut doc_type = None;
        let mut page = 1;
        let mut page_size = 20;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "type" => doc_type = Some(value.into_owned()),
                "page" => page = value.parse().unwrap_or(1),
                "pageSize" => page_size = value.parse().unwrap_or(20),
                _ => {}
            }
        }

        let doc_type = doc_type
            .ok_or_else(|| BlogError::malformed(format!("cursor has no type: {}", cursor)))?;
        let mut query = Query::documents_of_type(&doc_type, page_size);
        query.page = page;
        Ok(self.search(&query))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::richtext::{Block, BlockKind, RichText};
    use crate::store::{ContentGroup, Document, ImageField, PostDocumentData};

    pub fn paragraph(text: &str) -> Block {
        Block {
            kind: BlockKind::Paragraph,
            text: text.to_string(),
            ..Block::default()
        }
    }

    /// A `posts` document with one content group per body text
    pub fn post(uid: &str, bodies: &[&str]) -> Document {
        Document {
            id: format!("id-{}", uid),
            uid: Some(uid.to_string()),
            doc_type: "posts".to_string(),
            first_publication_date: Some("2021-03-15T19:25:28+0000".to_string()),
            last_publication_date: None,
            data: PostDocumentData {
                title: format!("Title {}", uid),
                subtitle: format!("Subtitle {}", uid),
                author: "Joseph Oliveira".to_string(),
                banner: ImageField {
                    url: format!("https://images.example.com/{}.png", uid),
                    alt: None,
                },
                content: bodies
                    .iter()
                    .enumerate()
                    .map(|(i, body)| ContentGroup {
                        heading: format!("Heading {}", i + 1),
                        body: RichText::from(vec![paragraph(body)]),
                    })
                    .collect(),
            },
        }
    }

    pub fn posts(count: usize) -> Vec<Document> {
        (1..=count)
            .map(|i| post(&format!("post-{}", i), &["lorem ipsum"]))
            .collect()
    }
}
