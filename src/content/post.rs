//! Post models handed to the templates

use serde::{Deserialize, Serialize};

use crate::store::Cursor;

/// A post as shown on the listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Document UID, used as the URL slug
    pub slug: Option<String>,

    /// Raw first-publication timestamp, as the store returned it
    pub first_publication_date: Option<String>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// A fully assembled post page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub slug: Option<String>,
    pub first_publication_date: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner: Banner,
    pub content: Vec<ContentSection>,

    /// Estimated reading time in minutes, recomputed on every assembly
    pub reading_time: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
}

/// One heading with its rendered body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    pub heading: String,
    pub body: Vec<BodyHtml>,
}

/// Rendered rich text. Not sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyHtml {
    pub text: String,
}

/// First listing page plus the cursor for the rest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPagination {
    pub next_page: Option<Cursor>,
    pub results: Vec<Post>,
}

/// Result of following a cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextPage {
    pub next_page: Option<Cursor>,
    pub posts: Vec<Post>,
}
