//! Error types for the content pipelines
//!
//! The store, rich-text and pipeline layers return [`BlogError`]. Commands and
//! the CLI wrap it with `anyhow` for context.

use std::path::PathBuf;

/// Errors raised while fetching, transforming or rendering content
#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    /// The store has no document with this UID
    #[error("document not found: {doc_type}/{uid}")]
    NotFound { doc_type: String, uid: String },

    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("network error: {0}")]
    Network(String),

    /// The store answered with a non-success status
    #[error("{url}: HTTP {status}")]
    Http { status: u16, url: String },

    /// The store answered but the payload could not be decoded
    #[error("malformed response: {message}")]
    Malformed { message: String },

    /// Invalid or incomplete configuration
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Template rendering error
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// Convenience alias used by the library modules
pub type Result<T> = std::result::Result<T, BlogError>;

impl BlogError {
    pub fn not_found(doc_type: impl Into<String>, uid: impl Into<String>) -> Self {
        Self::NotFound {
            doc_type: doc_type.into(),
            uid: uid.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is the "no such document" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Transport errors and server-side failures are worth another attempt.
    /// Client errors and bad payloads are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = BlogError::not_found("posts", "hello-world");
        assert_eq!(err.to_string(), "document not found: posts/hello-world");

        let err = BlogError::Http {
            status: 503,
            url: "https://repo.cdn.prismic.io/api/v2".to_string(),
        };
        assert_eq!(err.to_string(), "https://repo.cdn.prismic.io/api/v2: HTTP 503");
    }

    #[test]
    fn test_retryable() {
        assert!(BlogError::Network("timed out".into()).is_retryable());
        assert!(BlogError::Http { status: 502, url: String::new() }.is_retryable());
        assert!(!BlogError::Http { status: 404, url: String::new() }.is_retryable());
        assert!(!BlogError::malformed("missing results").is_retryable());
        assert!(!BlogError::not_found("posts", "x").is_retryable());
    }
}
