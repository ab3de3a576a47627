//! Graph stores: where snapshots come from.
//!
//! A store answers one question per graph identifier: here is the graph,
//! or there is no such graph. An existing graph with no edges is still a
//! graph. Stores are read-only; every load builds a fresh snapshot that the
//! caller owns for the rest of its session.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use graph_query_core::Graph;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::ingest::{self, GraphDocument};

pub trait GraphStore {
    /// Build a snapshot of `graph_id`, or `Ok(None)` if the store has no
    /// graph with that identifier.
    fn load(&self, graph_id: &str) -> Result<Option<Graph>>;

    /// Whether the store has a graph with this identifier.
    fn contains(&self, graph_id: &str) -> Result<bool> {
        Ok(self.load(graph_id)?.is_some())
    }
}

/// Load a snapshot and enforce the memory cap on it.
pub fn load_snapshot<S>(store: &S, graph_id: &str, settings: &Settings) -> Result<Option<Graph>>
where
    S: GraphStore + ?Sized,
{
    let start = Instant::now();
    let Some(graph) = store.load(graph_id)? else {
        info!(graph = graph_id, "graph not found");
        return Ok(None);
    };

    let used = graph.memory_usage();
    if used > settings.max_memory_bytes() {
        return Err(Error::MemoryLimit {
            graph_id: graph_id.to_string(),
            used_mb: used.div_ceil(1024 * 1024),
            max_mb: settings.max_memory_mb,
        });
    }

    info!(
        graph = graph_id,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        load_time_ms = start.elapsed().as_secs_f64() * 1000.0,
        "loaded graph snapshot"
    );
    Ok(Some(graph))
}

/// Graph documents held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: HashMap<String, GraphDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, replacing any earlier one with the same identifier.
    pub fn insert(&mut self, doc: GraphDocument) {
        self.documents.insert(doc.id.clone(), doc);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl GraphStore for MemoryStore {
    fn load(&self, graph_id: &str) -> Result<Option<Graph>> {
        Ok(self.documents.get(graph_id).map(GraphDocument::to_graph))
    }

    fn contains(&self, graph_id: &str) -> Result<bool> {
        Ok(self.documents.contains_key(graph_id))
    }
}

/// A read-only catalog of XML graph documents in one directory.
///
/// The catalog maps each document's `<id>` to its file and is built when
/// the store is opened. Documents are re-read on every load, so a snapshot
/// reflects the file as it is at load time.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    catalog: HashMap<String, PathBuf>,
}

impl DirectoryStore {
    /// Scan `root` for `*.xml` documents. Files that fail to parse are
    /// skipped with a warning; when two files declare the same graph id
    /// the first in path order wins.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        let mut files: Vec<PathBuf> = std::fs::read_dir(&root)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "xml"))
            .collect();
        files.sort();

        let mut catalog: HashMap<String, PathBuf> = HashMap::with_capacity(files.len());
        for path in files {
            match ingest::parse_file(&path) {
                Ok(doc) => {
                    if let Some(existing) = catalog.get(&doc.id) {
                        warn!(
                            graph = %doc.id,
                            kept = %existing.display(),
                            skipped = %path.display(),
                            "duplicate graph id"
                        );
                        continue;
                    }
                    catalog.insert(doc.id, path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping invalid graph document"),
            }
        }

        debug!(root = %root.display(), graphs = catalog.len(), "opened graph directory");
        Ok(Self { root, catalog })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifiers of every catalogued graph, sorted.
    pub fn graph_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.catalog.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl GraphStore for DirectoryStore {
    fn load(&self, graph_id: &str) -> Result<Option<Graph>> {
        let Some(path) = self.catalog.get(graph_id) else {
            return Ok(None);
        };
        let doc = ingest::parse_file(path)?;
        if doc.id != graph_id {
            warn!(
                graph = graph_id,
                path = %path.display(),
                found = %doc.id,
                "document id changed since the catalog was built"
            );
            return Ok(None);
        }
        Ok(Some(doc.into_graph()))
    }

    fn contains(&self, graph_id: &str) -> Result<bool> {
        Ok(self.catalog.contains_key(graph_id))
    }
}
