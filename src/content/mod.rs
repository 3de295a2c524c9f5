//! Content module - post models and the document transforms

mod post;
mod transform;

pub use post::{Banner, BodyHtml, ContentSection, NextPage, Post, PostDetail, PostPagination};
pub use transform::{
    count_tokens, reading_time, to_detail_post, to_listing_post, AssembleOptions, ContentBlocks,
};
