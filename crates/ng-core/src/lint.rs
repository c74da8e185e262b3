//! Lint diagnostics for persisted documents.
//!
//! Reports structural issues without modifying the document. The same
//! diagnostic type is produced by [`NodeGraph::from_document`] for every
//! record it drops or repairs while loading.
//!
//! [`NodeGraph::from_document`]: crate::model::NodeGraph::from_document

use crate::document::Document;
use crate::geometry::NodeMetrics;
use crate::id::PortId;
use crate::model::PortRole;
use std::collections::{HashMap, HashSet};
use std::fmt;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Breaks referential integrity; the record is dropped or repaired on load.
    Warning,
    /// Informational; normalized silently on load.
    Info,
}

/// A single diagnostic about a document record.
#[derive(Debug, Clone, PartialEq)]
pub struct LintDiagnostic {
    /// Human-readable message.
    pub message: String,
    /// Severity level.
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-connection").
    pub rule: &'static str,
}

impl LintDiagnostic {
    pub fn warning(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: LintSeverity::Warning,
            rule,
        }
    }

    pub fn info(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: LintSeverity::Info,
            rule,
        }
    }
}

impl fmt::Display for LintDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        };
        write!(f, "{level}[{}]: {}", self.rule, self.message)
    }
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over a document and return diagnostics.
#[must_use]
pub fn lint_document(doc: &Document, metrics: &NodeMetrics) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    let ports = lint_nodes(doc, metrics, &mut diags);
    lint_connections(doc, &ports, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Owner index (position in `doc.nodes`) and role of every port.
type PortTable = HashMap<PortId, (usize, PortRole)>;

/// Node-level rules: duplicate ids, missing ports, non-derived heights.
fn lint_nodes(doc: &Document, metrics: &NodeMetrics, diags: &mut Vec<LintDiagnostic>) -> PortTable {
    let mut node_ids = HashSet::new();
    let mut ports = PortTable::new();

    for (i, rec) in doc.nodes.iter().enumerate() {
        if !node_ids.insert(rec.id) {
            diags.push(LintDiagnostic::warning(
                "duplicate-node-id",
                format!("node {} appears more than once", rec.id),
            ));
            continue;
        }

        if rec.input_port_id.as_str().is_empty() {
            diags.push(LintDiagnostic::warning(
                "missing-input-port",
                format!("node {} has no input port id", rec.id),
            ));
        }

        if rec.output_port_ids.is_empty() {
            diags.push(LintDiagnostic::warning(
                "missing-output-port",
                format!("node {} has no output ports", rec.id),
            ));
        }

        let owned = std::iter::once((rec.input_port_id, PortRole::In))
            .filter(|(p, _)| !p.as_str().is_empty())
            .chain(rec.output_port_ids.iter().map(|p| (*p, PortRole::Out)));
        for (port, role) in owned {
            if ports.insert(port, (i, role)).is_some() {
                diags.push(LintDiagnostic::warning(
                    "duplicate-port-id",
                    format!("port {port} on node {} is used by another port", rec.id),
                ));
            }
        }

        let derived = metrics.node_height(rec.output_port_ids.len());
        if rec.height != derived {
            diags.push(LintDiagnostic::info(
                "height-mismatch",
                format!(
                    "node {} height {} differs from derived height {derived}",
                    rec.id, rec.height
                ),
            ));
        }
    }
    ports
}

/// Connection-level rules: dangling ends, self-loops, shared outputs.
fn lint_connections(doc: &Document, ports: &PortTable, diags: &mut Vec<LintDiagnostic>) {
    let mut used_outputs = HashSet::new();
    for c in &doc.connections {
        let input = ports.get(&c.input).filter(|(_, r)| *r == PortRole::In);
        let output = ports.get(&c.output).filter(|(_, r)| *r == PortRole::Out);
        let (Some((in_node, _)), Some((out_node, _))) = (input, output) else {
            diags.push(LintDiagnostic::warning(
                "dangling-connection",
                format!("connection {} -> {} references a missing port", c.output, c.input),
            ));
            continue;
        };
        if in_node == out_node {
            diags.push(LintDiagnostic::warning(
                "self-loop",
                format!("connection {} -> {} loops back into one node", c.output, c.input),
            ));
            continue;
        }
        if !used_outputs.insert(c.output) {
            diags.push(LintDiagnostic::warning(
                "shared-output",
                format!("output {} has more than one connection", c.output),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeRecord;
    use crate::id::NodeId;
    use crate::model::Connection;

    fn record(id: &str, input: &str, outputs: &[&str]) -> NodeRecord {
        NodeRecord {
            id: NodeId::intern(id),
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 50.0 * outputs.len() as f32,
            title: id.to_string(),
            input_port_id: PortId::intern(input),
            output_port_ids: outputs.iter().map(|p| PortId::intern(p)).collect(),
        }
    }

    fn rules(diags: &[LintDiagnostic]) -> Vec<&'static str> {
        diags.iter().map(|d| d.rule).collect()
    }

    #[test]
    fn clean_document_has_no_diagnostics() {
        let doc = Document {
            nodes: vec![record("a", "a_in", &["a_out"]), record("b", "b_in", &["b_out"])],
            connections: vec![Connection::new(PortId::intern("b_in"), PortId::intern("a_out"))],
        };
        assert!(lint_document(&doc, &NodeMetrics::default()).is_empty());
    }

    #[test]
    fn reports_dangling_and_reversed_connections() {
        let doc = Document {
            nodes: vec![record("a", "a_in", &["a_out"]), record("b", "b_in", &["b_out"])],
            connections: vec![
                Connection::new(PortId::intern("nowhere"), PortId::intern("a_out")),
                Connection::new(PortId::intern("a_out"), PortId::intern("b_in")),
            ],
        };
        let diags = lint_document(&doc, &NodeMetrics::default());
        assert_eq!(rules(&diags), vec!["dangling-connection", "dangling-connection"]);
    }

    #[test]
    fn reports_self_loop_and_shared_output() {
        let doc = Document {
            nodes: vec![
                record("a", "a_in", &["a_out"]),
                record("b", "b_in", &["b_out"]),
                record("c", "c_in", &["c_out"]),
            ],
            connections: vec![
                Connection::new(PortId::intern("a_in"), PortId::intern("a_out")),
                Connection::new(PortId::intern("b_in"), PortId::intern("c_out")),
                Connection::new(PortId::intern("a_in"), PortId::intern("c_out")),
            ],
        };
        let diags = lint_document(&doc, &NodeMetrics::default());
        assert_eq!(rules(&diags), vec!["self-loop", "shared-output"]);
    }

    #[test]
    fn reports_duplicates_and_height() {
        let mut tall = record("t", "t_in", &["t_out"]);
        tall.height = 120.0;
        let doc = Document {
            nodes: vec![
                record("a", "a_in", &["a_out"]),
                record("a", "x_in", &["x_out"]),
                record("b", "a_in", &["b_out"]),
                tall,
            ],
            connections: vec![],
        };
        let diags = lint_document(&doc, &NodeMetrics::default());
        assert_eq!(
            rules(&diags),
            vec!["duplicate-node-id", "duplicate-port-id", "height-mismatch"]
        );
        assert_eq!(diags[2].severity, LintSeverity::Info);
    }

    #[test]
    fn reports_node_without_outputs() {
        let doc = Document {
            nodes: vec![record("bare", "bare_in", &[])],
            connections: vec![],
        };
        let diags = lint_document(&doc, &NodeMetrics::default());
        assert_eq!(rules(&diags), vec!["missing-output-port"]);
        assert_eq!(diags[0].severity, LintSeverity::Warning);
    }
}
