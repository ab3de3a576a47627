//! XML graph document ingestion and validation.
//!
//! Document shape (edge entries inside `<edges>` are `<node>` elements):
//!
//! ```xml
//! <graph>
//!   <id>g1</id>
//!   <name>Example</name>
//!   <nodes>
//!     <node><id>a</id><name>Node A</name></node>
//!   </nodes>
//!   <edges>
//!     <node><id>e1</id><from>a</from><to>a</to><cost>1.5</cost></node>
//!   </edges>
//! </graph>
//! ```
//!
//! Everything the engine trusts about a snapshot is checked here: node ids
//! are unique, every edge endpoint is a declared node, and every cost is a
//! non-negative number.

use std::collections::HashSet;
use std::path::Path;

use graph_query_core::{EdgeRecord, Graph, NodeRecord};
use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::IngestError;

/// A validated graph document.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphDocument {
    pub id: String,
    pub name: String,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    /// Build the engine snapshot for this document.
    pub fn to_graph(&self) -> Graph {
        Graph::from_records(
            self.id.clone(),
            self.nodes.iter().cloned(),
            self.edges.iter().cloned(),
        )
    }

    pub fn into_graph(self) -> Graph {
        Graph::from_records(self.id, self.nodes, self.edges)
    }
}

/// Read and validate a graph document from disk.
pub fn parse_file(path: &Path) -> Result<GraphDocument, IngestError> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = parse_str(&text)?;
    debug!(
        path = %path.display(),
        graph = %doc.id,
        nodes = doc.nodes.len(),
        edges = doc.edges.len(),
        "parsed graph document"
    );
    Ok(doc)
}

/// Parse and validate a graph document.
pub fn parse_str(xml: &str) -> Result<GraphDocument, IngestError> {
    let tree = Document::parse(xml)?;
    let root = tree.root_element();

    let id = child_text(root, "id")?;
    let name = child_text(root, "name")?;

    let nodes = child(root, "nodes")?
        .children()
        .filter(|n| n.has_tag_name("node"))
        .map(|n| -> Result<NodeRecord, IngestError> {
            Ok(NodeRecord::new(child_text(n, "id")?, child_text(n, "name")?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let declared = validate_nodes(&nodes)?;

    let edges = match find_child(root, "edges") {
        Some(list) => list
            .children()
            .filter(|n| n.has_tag_name("node"))
            .map(parse_edge)
            .collect::<Result<Vec<_>, IngestError>>()?,
        None => Vec::new(),
    };
    validate_edges(&edges, &declared)?;

    Ok(GraphDocument {
        id,
        name,
        nodes,
        edges,
    })
}

fn parse_edge(node: Node<'_, '_>) -> Result<EdgeRecord, IngestError> {
    let id = child_text(node, "id")?;
    let from = child_text(node, "from")?;
    let to = child_text(node, "to")?;

    // A missing <cost> element means zero; a present one must parse.
    let cost = match find_child(node, "cost") {
        None => 0.0,
        Some(elem) => elem
            .text()
            .map(str::trim)
            .and_then(|t| t.parse::<f64>().ok())
            .filter(|c| c.is_finite())
            .ok_or_else(|| IngestError::InvalidCost(id.clone()))?,
    };

    Ok(EdgeRecord::new(id, from, to, cost))
}

fn validate_nodes(nodes: &[NodeRecord]) -> Result<HashSet<&str>, IngestError> {
    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(IngestError::DuplicateNode(node.id.clone()));
        }
    }
    if seen.is_empty() {
        return Err(IngestError::NoNodes);
    }
    Ok(seen)
}

fn validate_edges(edges: &[EdgeRecord], declared: &HashSet<&str>) -> Result<(), IngestError> {
    for edge in edges {
        if !declared.contains(edge.from.as_str()) {
            return Err(IngestError::UnknownFromNode(edge.from.clone()));
        }
        if !declared.contains(edge.to.as_str()) {
            return Err(IngestError::UnknownToNode(edge.to.clone()));
        }
        if edge.cost < 0.0 {
            return Err(IngestError::NegativeCost {
                edge: edge.id.clone(),
                cost: edge.cost,
            });
        }
    }
    Ok(())
}

fn find_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name(name))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Result<Node<'a, 'input>, IngestError> {
    find_child(node, name).ok_or_else(|| IngestError::MissingElement(name.to_string()))
}

/// Trimmed text of a required child element. Whitespace-only counts as missing.
fn child_text(node: Node<'_, '_>, name: &str) -> Result<String, IngestError> {
    child(node, name)?
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| IngestError::MissingText(name.to_string()))
}
