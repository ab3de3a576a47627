//! graph-query: Serves path and cycle queries over stored graphs.
//!
//! Wraps graph-query-core with the pieces around it: a read-only graph
//! store backed by XML documents, ingestion and validation of those
//! documents, and a dispatcher that answers JSON requests. Each request
//! loads its own snapshot and drops it when answered.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod ingest;
pub mod protocol;
pub mod store;

pub use config::Settings;
pub use dispatch::Dispatcher;
pub use error::{Error, IngestError, Result};
pub use ingest::GraphDocument;
pub use store::{load_snapshot, DirectoryStore, GraphStore, MemoryStore};
