//! Wire shapes returned by the content API

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::richtext::RichText;

/// Opaque handle for "the next page of results".
///
/// For the HTTP store this is a fully-qualified search URL; callers never
/// look inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of a document search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results_per_page: u32,
    #[serde(default)]
    pub results_size: u32,
    #[serde(default)]
    pub total_results_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub next_page: Option<Cursor>,
    #[serde(default)]
    pub prev_page: Option<Cursor>,
    pub results: Vec<Document>,
}

/// A published document of type `posts`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    pub data: PostDocumentData,
}

/// Typed `data` payload of a `posts` document.
///
/// Empty fields come back from the API as `null`; they read as defaults here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDocumentData {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "nullable")]
    pub author: String,
    #[serde(default, deserialize_with = "nullable")]
    pub banner: ImageField,
    #[serde(default, deserialize_with = "nullable")]
    pub content: Vec<ContentGroup>,
}

/// Image field; an empty image is `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageField {
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// One `{heading, body}` entry of the `content` group field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentGroup {
    #[serde(default, deserialize_with = "nullable")]
    pub heading: String,
    #[serde(default, deserialize_with = "nullable")]
    pub body: RichText,
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
