//! Paint walk: feeds node, port, and wire geometry to a rendering collaborator.
//!
//! The walk owns no pixels. A host implements [`Painter`] on top of whatever
//! 2D backend it uses; `Vec<PaintCommand>` is a ready-made display list.

use crate::hit::{input_port_rect, output_port_rect, port_anchor};
use crate::wire::{WireStyle, handle_bounds, preview_curve, wire_curve};
use kurbo::{CubicBez, Point};
use ng_core::model::*;
use ng_core::{Bounds, PortId};

/// Rendering collaborator. Receives geometry and state, draws it.
pub trait Painter {
    /// Node body. `node.is_selected` picks the highlighted style.
    fn node(&mut self, node: &Node);
    /// Port with its computed rectangle.
    fn port(&mut self, port: &Port, rect: Bounds);
    /// Connection curve plus the square removal handle at its midpoint.
    fn wire(&mut self, connection: &Connection, curve: &CubicBez, handle: Bounds);
    /// Preview curve from a pending port to the pointer.
    fn pending_wire(&mut self, port: PortId, curve: &CubicBez);
}

/// One recorded paint call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Node {
        node: NodeSnapshot,
    },
    Port {
        port: Port,
        rect: Bounds,
    },
    Wire {
        connection: Connection,
        curve: CubicBez,
        handle: Bounds,
    },
    PendingWire {
        port: PortId,
        curve: CubicBez,
    },
}

/// The parts of a node a display list needs.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub id: ng_core::NodeId,
    pub title: String,
    pub bounds: Bounds,
    pub selected: bool,
}

impl Painter for Vec<PaintCommand> {
    fn node(&mut self, node: &Node) {
        self.push(PaintCommand::Node {
            node: NodeSnapshot {
                id: node.id,
                title: node.title.clone(),
                bounds: node.bounds(),
                selected: node.is_selected,
            },
        });
    }

    fn port(&mut self, port: &Port, rect: Bounds) {
        self.push(PaintCommand::Port { port: *port, rect });
    }

    fn wire(&mut self, connection: &Connection, curve: &CubicBez, handle: Bounds) {
        self.push(PaintCommand::Wire {
            connection: *connection,
            curve: *curve,
            handle,
        });
    }

    fn pending_wire(&mut self, port: PortId, curve: &CubicBez) {
        self.push(PaintCommand::PendingWire { port, curve: *curve });
    }
}

/// In-progress connection preview: the pending port and the pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingWire {
    pub port: PortId,
    pub cursor: Point,
}

/// Paint the whole graph: nodes bottom-to-top (each followed by its ports),
/// then connections, then the pending preview on top.
pub fn paint_graph(
    painter: &mut dyn Painter,
    graph: &NodeGraph,
    pending: Option<PendingWire>,
    style: &WireStyle,
) {
    let metrics = graph.metrics();

    for node in graph.nodes() {
        painter.node(node);
        let b = node.bounds();
        let input = Port {
            id: node.input_port(),
            node: node.id,
            role: PortRole::In,
            index: 0,
        };
        painter.port(&input, input_port_rect(b, metrics));
        for (index, &id) in node.output_ports().iter().enumerate() {
            let port = Port {
                id,
                node: node.id,
                role: PortRole::Out,
                index,
            };
            painter.port(&port, output_port_rect(b, index, metrics));
        }
    }

    for c in graph.connections() {
        let (Some(from), Some(to)) = (port_anchor(graph, c.output), port_anchor(graph, c.input))
        else {
            log::trace!("skipping wire {} -> {}: unresolved port", c.output, c.input);
            continue;
        };
        let curve = wire_curve(from, to, style);
        painter.wire(c, &curve, handle_bounds(&curve, style));
    }

    if let Some(p) = pending {
        let (Some(anchor), Some(view)) = (port_anchor(graph, p.port), graph.port(p.port)) else {
            log::trace!("pending port {} no longer exists", p.port);
            return;
        };
        let from_input = view.role == PortRole::In;
        painter.pending_wire(p.port, &preview_curve(anchor, p.cursor, from_input, style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ng_core::Position;
    use pretty_assertions::assert_eq;

    fn kinds(list: &[PaintCommand]) -> Vec<&'static str> {
        list.iter()
            .map(|c| match c {
                PaintCommand::Node { .. } => "node",
                PaintCommand::Port { .. } => "port",
                PaintCommand::Wire { .. } => "wire",
                PaintCommand::PendingWire { .. } => "pending",
            })
            .collect()
    }

    #[test]
    fn paint_order_nodes_then_wires_then_preview() {
        let mut g = NodeGraph::new();
        let a = g.add_node(Position::new(0.0, 0.0));
        let b = g.add_node(Position::new(300.0, 0.0));
        let out = g.node(a).unwrap().output_ports()[0];
        let input = g.node(b).unwrap().input_port();
        g.connect(input, out).unwrap();
        g.node_mut(b).unwrap().is_selected = true;

        let mut list: Vec<PaintCommand> = Vec::new();
        let pending = PendingWire {
            port: g.node(b).unwrap().output_ports()[0],
            cursor: Point::new(700.0, 300.0),
        };
        paint_graph(&mut list, &g, Some(pending), &WireStyle::default());

        assert_eq!(
            kinds(&list),
            vec!["node", "port", "port", "node", "port", "port", "wire", "pending"]
        );
        let PaintCommand::Node { node } = &list[3] else {
            panic!("expected node");
        };
        assert!(node.selected);
        let PaintCommand::PendingWire { curve, .. } = &list[7] else {
            panic!("expected pending wire");
        };
        assert_eq!(curve.p3, Point::new(700.0, 300.0));
    }

    #[test]
    fn stale_pending_port_is_skipped() {
        let mut g = NodeGraph::new();
        let a = g.add_node(Position::default());
        let gone = g.node(a).unwrap().output_ports()[0];
        g.remove_node(a);
        let mut list: Vec<PaintCommand> = Vec::new();
        paint_graph(
            &mut list,
            &g,
            Some(PendingWire {
                port: gone,
                cursor: Point::ZERO,
            }),
            &WireStyle::default(),
        );
        assert!(list.is_empty());
    }
}
