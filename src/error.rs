//! Error types for dumping and comparing trees

use std::fmt;
use thiserror::Error;

/// Errors that can occur while walking a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DumpError {
    /// The tree is deeper than the walker allows (likely a cycle in the provider)
    #[error("tree depth exceeds the limit of {limit} levels")]
    DepthExceeded { limit: usize },
}

/// Errors from selecting an output format by name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unknown output format: {0} (expected one of: json, legacy)")]
    UnknownFormat(String),
}

/// Which document of a comparison an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSide {
    Expected,
    Actual,
}

impl fmt::Display for DocumentSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSide::Expected => write!(f, "expected"),
            DocumentSide::Actual => write!(f, "actual"),
        }
    }
}

/// Errors that can occur while comparing two dumps
#[derive(Debug, Error)]
pub enum CompareError {
    /// A document is not valid JSON
    #[error("failed to parse {side} document: {source}")]
    Parse {
        side: DocumentSide,
        #[source]
        source: serde_json::Error,
    },
    /// The documents differ structurally
    #[error("dumps differ:\n{trail}")]
    Mismatch { trail: String },
    /// A value the comparator has no rule for (an internal error, never a mismatch)
    #[error("schema violation at {path}: {detail}")]
    SchemaViolation { path: String, detail: String },
}

impl CompareError {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, CompareError::Mismatch { .. })
    }
}
