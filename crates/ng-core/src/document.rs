//! Persisted document: the serializable form of a [`NodeGraph`].
//!
//! Only identity, geometry, titles, and port-id pairs are persisted.
//! Selection and drag state are transient and reset on load; port rectangles
//! are always recomputed from node bounds.
//!
//! Three codecs share the same `Document` value: JSON (`.json`),
//! MessagePack (`.ngb`), and the `.ng` text format (see [`crate::text`]).

use crate::error::DocumentError;
use crate::geometry::{Bounds, NodeMetrics};
use crate::id::{NodeId, PortId};
use crate::lint::LintDiagnostic;
use crate::model::{Connection, Node, NodeGraph};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A node as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub input_port_id: PortId,
    pub output_port_ids: Vec<PortId>,
}

impl NodeRecord {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        let b = node.bounds();
        Self {
            id: node.id,
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
            title: node.title.clone(),
            input_port_id: node.input_port(),
            output_port_ids: node.output_ports().to_vec(),
        }
    }
}

/// The whole persisted graph: nodes in z-order, connections in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Codec selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    MessagePack,
    Text,
}

impl DocumentFormat {
    /// Map a path's extension to a codec.
    ///
    /// # Errors
    /// `UnknownFormat` for anything other than `.json`, `.ngb`, `.ng`.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("ngb") => Ok(Self::MessagePack),
            Some("ng") => Ok(Self::Text),
            other => Err(DocumentError::UnknownFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    /// # Errors
    /// Returns the `serde_json` error if the input is not a valid document.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// # Errors
    /// Propagates `serde_json` serialization errors.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    /// Returns the `rmp-serde` error if the bytes are not a valid document.
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, DocumentError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    /// Encode as MessagePack with named fields (a map per record).
    ///
    /// # Errors
    /// Propagates `rmp-serde` encode errors.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Decode from raw bytes in the given format.
    ///
    /// # Errors
    /// Codec errors, or a UTF-8 error for text formats.
    pub fn decode(bytes: &[u8], format: DocumentFormat) -> Result<Self, DocumentError> {
        match format {
            DocumentFormat::MessagePack => Self::from_msgpack(bytes),
            DocumentFormat::Json | DocumentFormat::Text => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| DocumentError::Text(format!("invalid UTF-8: {e}")))?;
                match format {
                    DocumentFormat::Json => Self::from_json(text),
                    _ => crate::text::parse_document(text).map_err(DocumentError::Text),
                }
            }
        }
    }

    /// Encode to raw bytes in the given format.
    ///
    /// # Errors
    /// Codec errors.
    pub fn encode(&self, format: DocumentFormat) -> Result<Vec<u8>, DocumentError> {
        match format {
            DocumentFormat::Json => Ok(self.to_json()?.into_bytes()),
            DocumentFormat::MessagePack => self.to_msgpack(),
            DocumentFormat::Text => Ok(crate::text::emit_document(self).into_bytes()),
        }
    }

    /// Read a document from disk, picking the codec from the extension.
    ///
    /// # Errors
    /// I/O, unknown extension, or codec errors.
    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        let format = DocumentFormat::from_path(path)?;
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes, format)
    }

    /// Write a document to disk, picking the codec from the extension.
    ///
    /// # Errors
    /// I/O, unknown extension, or codec errors.
    pub fn write(&self, path: &Path) -> Result<(), DocumentError> {
        let format = DocumentFormat::from_path(path)?;
        std::fs::write(path, self.encode(format)?)?;
        Ok(())
    }
}

// ─── Graph ↔ Document ────────────────────────────────────────────────────

/// Result of loading a document: every valid record, plus a diagnostic
/// for each record that was dropped or repaired.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub graph: NodeGraph,
    pub diagnostics: Vec<LintDiagnostic>,
}

impl NodeGraph {
    /// Snapshot the persisted fields.
    #[must_use]
    pub fn to_document(&self) -> Document {
        Document {
            nodes: self.nodes().map(NodeRecord::from).collect(),
            connections: self.connections().copied().collect(),
        }
    }

    /// Rebuild a graph from a document with default metrics.
    #[must_use]
    pub fn from_document(doc: &Document) -> LoadReport {
        Self::from_document_with(doc, NodeMetrics::default())
    }

    /// Rebuild a graph from a document, validating referential integrity.
    ///
    /// Never fails as a whole: records that would break an invariant are
    /// dropped (or repaired, for a missing input or output port) and reported.
    #[must_use]
    pub fn from_document_with(doc: &Document, metrics: NodeMetrics) -> LoadReport {
        let mut graph = NodeGraph::with_metrics(metrics);
        let mut diagnostics = Vec::new();

        for rec in &doc.nodes {
            let input = if rec.input_port_id.as_str().is_empty() {
                let fresh = PortId::generate();
                diagnostics.push(LintDiagnostic::warning(
                    "missing-input-port",
                    format!("node {} had no input port id; assigned {fresh}", rec.id),
                ));
                fresh
            } else {
                rec.input_port_id
            };
            let mut outputs = rec.output_port_ids.clone();
            if outputs.is_empty() {
                let fresh = PortId::generate();
                diagnostics.push(LintDiagnostic::warning(
                    "missing-output-port",
                    format!("node {} had no output ports; assigned {fresh}", rec.id),
                ));
                outputs.push(fresh);
            }
            let node = Node::new(rec.id, rec.bounds(), rec.title.clone(), input, outputs);
            if let Err(e) = graph.insert_node(node) {
                let rule = if graph.contains_node(rec.id) {
                    "duplicate-node-id"
                } else {
                    "duplicate-port-id"
                };
                diagnostics.push(LintDiagnostic::warning(
                    rule,
                    format!("dropped node {}: {e}", rec.id),
                ));
            }
        }

        for c in &doc.connections {
            if let Some(existing) = graph.connection_on(c.output) {
                diagnostics.push(LintDiagnostic::warning(
                    "shared-output",
                    format!(
                        "dropped connection {} -> {}: output already feeds {}",
                        c.output, c.input, existing.input
                    ),
                ));
                continue;
            }
            if let Err(e) = graph.connect(c.input, c.output) {
                let owner = graph.owner_of(c.input);
                let rule = if owner.is_some() && owner == graph.owner_of(c.output) {
                    "self-loop"
                } else {
                    "dangling-connection"
                };
                diagnostics.push(LintDiagnostic::warning(
                    rule,
                    format!("dropped connection {} -> {}: {e}", c.output, c.input),
                ));
            }
        }

        for d in &diagnostics {
            log::warn!("{d}");
        }
        LoadReport { graph, diagnostics }
    }
}
