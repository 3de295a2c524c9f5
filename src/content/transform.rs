//! Document → post transforms

use serde::{Deserialize, Serialize};

use super::{Banner, BodyHtml, ContentSection, Post, PostDetail};
use crate::richtext::{self, LinkResolver};
use crate::store::Document;

/// How many content groups a post page carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentBlocks {
    /// Only the first `{heading, body}` group is rendered. Reading time
    /// still counts every group.
    #[default]
    #[serde(rename = "first")]
    FirstOnly,
    #[serde(rename = "all")]
    All,
}

/// Knobs for post assembly
#[derive(Debug, Clone, Copy)]
pub struct AssembleOptions {
    pub content_blocks: ContentBlocks,
    pub words_per_minute: u32,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            content_blocks: ContentBlocks::FirstOnly,
            words_per_minute: 200,
        }
    }
}

/// Narrow a document to its listing fields
pub fn to_listing_post(doc: &Document) -> Post {
    Post {
        slug: doc.uid.clone(),
        first_publication_date: doc.first_publication_date.clone(),
        title: doc.data.title.clone(),
        subtitle: doc.data.subtitle.clone(),
        author: doc.data.author.clone(),
    }
}

/// Build the post page shape, computing reading time over every group
pub fn to_detail_post(
    doc: &Document,
    options: &AssembleOptions,
    resolver: &dyn LinkResolver,
) -> PostDetail {
    let body_text = doc
        .data
        .content
        .iter()
        .map(|group| richtext::as_text(&group.body))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let groups = match options.content_blocks {
        ContentBlocks::FirstOnly => &doc.data.content[..doc.data.content.len().min(1)],
        ContentBlocks::All => &doc.data.content[..],
    };

    let content = groups
        .iter()
        .map(|group| ContentSection {
            heading: group.heading.clone(),
            body: vec![BodyHtml {
                text: richtext::as_html(&group.body, resolver),
            }],
        })
        .collect();

    PostDetail {
        slug: doc.uid.clone(),
        first_publication_date: doc.first_publication_date.clone(),
        title: doc.data.title.clone(),
        subtitle: doc.data.subtitle.clone(),
        author: doc.data.author.clone(),
        banner: Banner {
            url: doc.data.banner.url.clone(),
        },
        content,
        reading_time: reading_time(&body_text, options.words_per_minute),
    }
}

/// Tokens of `text` split on single spaces; empty text has none.
///
/// Consecutive spaces produce empty tokens, which are counted.
pub fn count_tokens(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.split(' ').count()
    }
}

/// Minutes to read `text` at `words_per_minute`, rounded up
pub fn reading_time(text: &str, words_per_minute: u32) -> u32 {
    let per_minute = words_per_minute.max(1) as usize;
    count_tokens(text).div_ceil(per_minute) as u32
}
