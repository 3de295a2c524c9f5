//! Fetch-and-transform pipelines shared by the listing and post pages

mod listing;
mod post;

pub use listing::{fetch_initial_page, fetch_next_page, ListingSession};
pub use post::{assemble_post, list_all_slugs, PostView, MANIFEST_PAGE_SIZE};
