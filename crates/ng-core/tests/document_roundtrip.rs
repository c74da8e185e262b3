//! Integration tests: graph → document → graph, across all three codecs.
//!
//! Exercises identity preservation, load-time integrity checks, and the
//! editing scenarios that drive output-port heights and replace semantics.

use ng_core::document::{Document, DocumentFormat, NodeRecord};
use ng_core::id::{NodeId, PortId};
use ng_core::lint::lint_document;
use ng_core::model::{Connection, NodeGraph};
use ng_core::text::{emit_document, parse_document};
use ng_core::{NodeMetrics, Position};
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn record(id: &str, x: f32, outputs: &[&str]) -> NodeRecord {
    NodeRecord {
        id: NodeId::intern(id),
        x,
        y: 0.0,
        width: 200.0,
        height: 50.0 * outputs.len() as f32,
        title: id.to_uppercase(),
        input_port_id: PortId::intern(&format!("{id}_in")),
        output_port_ids: outputs.iter().map(|p| PortId::intern(p)).collect(),
    }
}

fn wire(output: &str, input: &str) -> Connection {
    Connection::new(PortId::intern(input), PortId::intern(output))
}

/// Three nodes in a chain with a fan-out on the middle node.
fn chain_document() -> Document {
    Document {
        nodes: vec![
            record("rt_a", 0.0, &["rt_a_o1"]),
            record("rt_b", 300.0, &["rt_b_o1", "rt_b_o2"]),
            record("rt_c", 600.0, &["rt_c_o1"]),
        ],
        connections: vec![
            wire("rt_a_o1", "rt_b_in"),
            wire("rt_b_o1", "rt_c_in"),
            wire("rt_b_o2", "rt_c_in"),
        ],
    }
}

// ─── Round-trip identity ─────────────────────────────────────────────────

#[test]
fn well_formed_document_roundtrips_through_graph() {
    let doc = chain_document();
    let report = NodeGraph::from_document(&doc);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(report.graph.to_document(), doc);
    assert!(report.graph.check_integrity().is_ok());
}

#[test]
fn roundtrip_through_every_codec() {
    let doc = chain_document();
    for format in [
        DocumentFormat::Json,
        DocumentFormat::MessagePack,
        DocumentFormat::Text,
    ] {
        let bytes = doc.encode(format).expect("encode failed");
        let back = Document::decode(&bytes, format).expect("decode failed");
        assert_eq!(back, doc, "codec {format:?} lost data");
    }
}

#[test]
fn text_format_keeps_titles_and_order() {
    let mut doc = chain_document();
    doc.nodes[1].title = "Split \"left\" \\ right".to_string();
    let text = emit_document(&doc);
    let back = parse_document(&text).unwrap();
    assert_eq!(back.nodes[1].title, doc.nodes[1].title);
    let ids: Vec<&str> = back.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["rt_a", "rt_b", "rt_c"]);
}

#[test]
fn file_roundtrip_picks_codec_from_extension() {
    let dir = std::env::temp_dir().join(format!("ng-core-rt-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let doc = chain_document();
    for name in ["g.json", "g.ngb", "g.ng"] {
        let path = dir.join(name);
        doc.write(&path).unwrap();
        assert_eq!(Document::read(&path).unwrap(), doc, "{name}");
    }
    assert!(doc.write(&dir.join("g.yaml")).is_err());
    std::fs::remove_dir_all(&dir).unwrap();
}

// ─── Load-time integrity ─────────────────────────────────────────────────

#[test]
fn dangling_connections_are_dropped_not_fatal() {
    let mut doc = chain_document();
    doc.connections.push(wire("rt_gone_o1", "rt_c_in"));
    doc.connections.push(wire("rt_c_o1", "rt_gone_in"));

    let report = NodeGraph::from_document(&doc);
    assert_eq!(report.graph.len(), 3);
    assert_eq!(report.graph.connection_count(), 3);
    let rules: Vec<&str> = report.diagnostics.iter().map(|d| d.rule).collect();
    assert_eq!(rules, vec!["dangling-connection", "dangling-connection"]);
}

#[test]
fn second_connection_on_an_output_is_dropped() {
    let mut doc = chain_document();
    doc.connections.push(wire("rt_a_o1", "rt_c_in"));

    let report = NodeGraph::from_document(&doc);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].rule, "shared-output");
    assert_eq!(
        report.graph.connection_on(PortId::intern("rt_a_o1")),
        Some(wire("rt_a_o1", "rt_b_in"))
    );
}

#[test]
fn duplicate_node_keeps_first() {
    let mut doc = chain_document();
    let mut dup = record("rt_a", 900.0, &["rt_dup_o1"]);
    dup.title = "dup".to_string();
    doc.nodes.push(dup);

    let report = NodeGraph::from_document(&doc);
    assert_eq!(report.graph.len(), 3);
    assert_eq!(report.diagnostics[0].rule, "duplicate-node-id");
    assert_eq!(report.graph.node(NodeId::intern("rt_a")).unwrap().title, "RT_A");
}

#[test]
fn lint_and_load_agree_on_bad_records() {
    let mut doc = chain_document();
    doc.connections.push(wire("rt_b_o1", "rt_b_in"));
    doc.connections.push(wire("rt_x_o1", "rt_a_in"));

    let lint: Vec<&str> = lint_document(&doc, &NodeMetrics::default())
        .iter()
        .map(|d| d.rule)
        .collect();
    let load: Vec<&str> = NodeGraph::from_document(&doc)
        .diagnostics
        .iter()
        .map(|d| d.rule)
        .collect();
    assert_eq!(lint, vec!["self-loop", "dangling-connection"]);
    // The self-loop shares an output with an earlier wire, so loading reports it as shared.
    assert_eq!(load, vec!["shared-output", "dangling-connection"]);
}

#[test]
fn heights_are_rederived_on_load() {
    let mut doc = chain_document();
    doc.nodes[0].height = 999.0;
    let report = NodeGraph::from_document(&doc);
    let node = report.graph.node(NodeId::intern("rt_a")).unwrap();
    assert_eq!(node.bounds().height, 50.0);
}

#[test]
fn node_without_outputs_gets_one_on_load() {
    let mut doc = chain_document();
    doc.nodes[2].output_port_ids.clear();
    doc.nodes[2].height = 0.0;

    let report = NodeGraph::from_document(&doc);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].rule, "missing-output-port");
    let node = report.graph.node(NodeId::intern("rt_c")).unwrap();
    assert_eq!(node.output_ports().len(), 1);
    assert_eq!(node.bounds().height, 50.0);
}

// ─── Editing scenarios ───────────────────────────────────────────────────

#[test]
fn remove_only_output_clears_its_connection() {
    let mut g = NodeGraph::new();
    let n1 = g.add_node(Position::new(0.0, 0.0));
    let n2 = g.add_node(Position::new(300.0, 0.0));
    let o1 = g.node(n1).unwrap().output_ports()[0];
    let i2 = g.node(n2).unwrap().input_port();

    g.connect(i2, o1).unwrap();
    assert_eq!(g.connections().copied().collect::<Vec<_>>(), vec![Connection::new(i2, o1)]);

    g.remove_output_port(n1, o1).unwrap();
    assert_eq!(g.connection_count(), 0);
    assert!(g.node(n1).unwrap().output_ports().is_empty());
    assert_eq!(g.node(n1).unwrap().bounds().height, 0.0);
    assert!(g.check_integrity().is_ok());
}

#[test]
fn reconnecting_an_output_replaces_the_old_wire() {
    let mut g = NodeGraph::new();
    let n1 = g.add_node(Position::new(0.0, 0.0));
    let n2 = g.add_node(Position::new(300.0, 0.0));
    let n3 = g.add_node(Position::new(300.0, 200.0));
    let o1 = g.node(n1).unwrap().output_ports()[0];
    let i2 = g.node(n2).unwrap().input_port();
    let i3 = g.node(n3).unwrap().input_port();

    g.connect(i2, o1).unwrap();
    g.connect(i3, o1).unwrap();
    assert_eq!(g.connection_count(), 1);
    assert_eq!(g.connection_on(o1), Some(Connection::new(i3, o1)));
}

#[test]
fn height_tracks_k_output_additions() {
    let mut g = NodeGraph::new();
    let id = g.add_node(Position::default());
    for k in 0..6 {
        let expected = 50.0 * (1 + k) as f32;
        assert_eq!(g.node(id).unwrap().bounds().height, expected);
        g.add_output_port(id).unwrap();
    }
}

#[test]
fn cascade_leaves_no_connection_to_removed_nodes() {
    let mut g = NodeGraph::new();
    let ids: Vec<NodeId> = (0..5)
        .map(|i| g.add_node(Position::new(i as f32 * 250.0, 0.0)))
        .collect();
    // Fully wire every ordered pair through fresh outputs.
    for &from in &ids {
        for &to in &ids {
            if from == to {
                continue;
            }
            let out = g.add_output_port(from).unwrap();
            let input = g.node(to).unwrap().input_port();
            g.connect(input, out).unwrap();
        }
    }
    assert_eq!(g.connection_count(), 20);

    for &victim in &[ids[1], ids[3]] {
        let ports: Vec<PortId> = g.node(victim).unwrap().port_ids().collect();
        g.remove_node(victim);
        assert!(g.connections().all(|c| !ports.iter().any(|p| c.touches(*p))));
        assert!(g.check_integrity().is_ok());
    }
    assert_eq!(g.connection_count(), 6);
}
