// src/error.rs
use schemagen_xpath1::XPathError;
use thiserror::Error;

/// A failed tree query. Always names the offending path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Invalid query '{path}': {source}")]
    XPath {
        path: String,
        #[source]
        source: XPathError,
    },

    #[error("Query '{path}' returned a {found}, not a node-set")]
    NotANodeSet { path: String, found: &'static str },
}

impl QueryError {
    pub fn path(&self) -> &str {
        match self {
            QueryError::XPath { path, .. } | QueryError::NotANodeSet { path, .. } => path,
        }
    }
}

/// Everything that can abort an extraction call.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Extraction failed: {0}")]
    Query(#[from] QueryError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
