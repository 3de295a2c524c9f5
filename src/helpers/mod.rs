//! Helper functions for templates
//!
//! Date formatting and URL generation shared by the generator, the server
//! and the template filters.

mod date;
mod url;

pub use date::*;
pub use url::*;
