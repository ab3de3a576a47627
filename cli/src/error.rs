//! Error types for graph-query.
//!
//! The engine itself never fails: an unknown node or a degenerate query is
//! an empty answer, not an error. Everything here belongs to the layers
//! around it.
//!
//! - **`IngestError`**: a graph document failed to parse or validate.
//! - **`Error`**: a request or command could not be served (I/O, bad
//!   input, configuration, resource limits).

use std::path::PathBuf;

use thiserror::Error;

/// Result type for graph-query operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// File system or stream operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request was not valid JSON, or a response could not be written
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// A recognized query object had the wrong shape
    #[error("malformed query at index {index}: {source}")]
    InvalidQuery {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Request carried no graph identifier
    #[error("graph_id is required in the input JSON")]
    MissingGraphId,

    /// Graph identifier is not in the store
    #[error("graph with ID '{0}' does not exist")]
    GraphNotFound(String),

    /// Graph document failed validation
    #[error("ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// Loaded snapshot is larger than the configured cap
    #[error("graph '{graph_id}' uses {used_mb}MB, exceeds max_memory_mb={max_mb}MB")]
    MemoryLimit {
        graph_id: String,
        used_mb: usize,
        max_mb: u32,
    },
}

/// A graph document failed to parse or validate.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML syntax error: {0}")]
    Syntax(#[from] roxmltree::Error),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("missing text for element: {0}")]
    MissingText(String),

    #[error("graph must have at least one node")]
    NoNodes,

    #[error("duplicate node id found: {0}")]
    DuplicateNode(String),

    #[error("edge references non-existent from node: {0}")]
    UnknownFromNode(String),

    #[error("edge references non-existent to node: {0}")]
    UnknownToNode(String),

    #[error("invalid cost value for edge {0}")]
    InvalidCost(String),

    #[error("edge cost must be non-negative: {cost} (edge {edge})")]
    NegativeCost { edge: String, cost: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_limit_message() {
        let err = Error::MemoryLimit {
            graph_id: "g1".into(),
            used_mb: 80,
            max_mb: 64,
        };
        assert_eq!(
            err.to_string(),
            "graph 'g1' uses 80MB, exceeds max_memory_mb=64MB"
        );
    }

    #[test]
    fn test_ingest_error_wraps() {
        let err: Error = IngestError::DuplicateNode("a".into()).into();
        assert_eq!(err.to_string(), "ingestion failed: duplicate node id found: a");
    }

    #[test]
    fn test_read_error_has_source() {
        let err = IngestError::Read {
            path: PathBuf::from("missing.xml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "failed to read missing.xml");
        assert!(std::error::Error::source(&err).is_some());
    }
}
