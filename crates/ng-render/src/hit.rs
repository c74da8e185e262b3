//! Port geometry and hit testing: point → port / wire / node lookup.
//!
//! Port rectangles are a pure function of the owning node's bounds and the
//! port's role and index. Hit tests walk nodes in reverse z-order
//! (last painted = topmost) so overlapping nodes resolve to the visible one.

use crate::wire::{WireStyle, handle_bounds, wire_curve};
use kurbo::Point;
use ng_core::model::*;
use ng_core::{Bounds, NodeId, NodeMetrics, PortId};

// ─── Port geometry ───────────────────────────────────────────────────────

/// Input port rectangle: on the node's left edge, centred on its full height.
pub fn input_port_rect(node: Bounds, metrics: &NodeMetrics) -> Bounds {
    Bounds::new(
        node.x - metrics.port_width + metrics.port_inset,
        node.y + node.height / 2.0 - metrics.port_height / 2.0,
        metrics.port_width,
        metrics.port_height,
    )
}

/// Output port rectangle: on the node's right edge, centred in row `index`.
pub fn output_port_rect(node: Bounds, index: usize, metrics: &NodeMetrics) -> Bounds {
    let row_centre = index as f32 * metrics.row_height + metrics.row_height / 2.0;
    Bounds::new(
        node.x + node.width - metrics.port_inset,
        node.y + row_centre - metrics.port_height / 2.0,
        metrics.port_width,
        metrics.port_height,
    )
}

/// Rectangle of any port in the graph.
pub fn port_rect(graph: &NodeGraph, port: PortId) -> Option<Bounds> {
    let view = graph.port(port)?;
    let bounds = graph.node(view.node)?.bounds();
    Some(match view.role {
        PortRole::In => input_port_rect(bounds, graph.metrics()),
        PortRole::Out => output_port_rect(bounds, view.index, graph.metrics()),
    })
}

/// Wire attachment point of a port (its rectangle's centre).
pub fn port_anchor(graph: &NodeGraph, port: PortId) -> Option<Point> {
    let (x, y) = port_rect(graph, port)?.center();
    Some(Point::new(f64::from(x), f64::from(y)))
}

// ─── Hit testing ─────────────────────────────────────────────────────────

/// What a pointer position lands on, in hit priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Port(PortId),
    /// The midpoint handle of a connection.
    Wire(Connection),
    Node(NodeId),
    Background,
}

/// Resolve a canvas position: port, then wire handle, then node body.
pub fn hit_test(graph: &NodeGraph, px: f32, py: f32, style: &WireStyle) -> Hit {
    if let Some(port) = hit_test_port(graph, px, py) {
        return Hit::Port(port);
    }
    if let Some(connection) = hit_test_wire_handle(graph, px, py, style) {
        return Hit::Wire(connection);
    }
    match hit_test_node(graph, px, py) {
        Some(id) => Hit::Node(id),
        None => Hit::Background,
    }
}

/// Topmost node whose bounds contain the point.
pub fn hit_test_node(graph: &NodeGraph, px: f32, py: f32) -> Option<NodeId> {
    graph
        .nodes()
        .rev()
        .find(|n| n.bounds().contains(px, py))
        .map(|n| n.id)
}

/// Topmost port whose rectangle contains the point.
pub fn hit_test_port(graph: &NodeGraph, px: f32, py: f32) -> Option<PortId> {
    let metrics = graph.metrics();
    for node in graph.nodes().rev() {
        let b = node.bounds();
        if input_port_rect(b, metrics).contains(px, py) {
            return Some(node.input_port());
        }
        for (i, &port) in node.output_ports().iter().enumerate() {
            if output_port_rect(b, i, metrics).contains(px, py) {
                return Some(port);
            }
        }
    }
    None
}

/// Most recently created connection whose midpoint handle contains the point.
pub fn hit_test_wire_handle(
    graph: &NodeGraph,
    px: f32,
    py: f32,
    style: &WireStyle,
) -> Option<Connection> {
    let mut hit = None;
    for c in graph.connections() {
        let (Some(from), Some(to)) = (port_anchor(graph, c.output), port_anchor(graph, c.input))
        else {
            continue;
        };
        if handle_bounds(&wire_curve(from, to, style), style).contains(px, py) {
            hit = Some(*c);
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use ng_core::Position;
    use pretty_assertions::assert_eq;

    #[test]
    fn port_rects_follow_node_bounds() {
        let m = NodeMetrics::default();
        let node = Bounds::new(100.0, 100.0, 200.0, 100.0);
        assert_eq!(
            input_port_rect(node, &m),
            Bounds::new(98.0, 140.0, 10.0, 20.0)
        );
        assert_eq!(
            output_port_rect(node, 0, &m),
            Bounds::new(292.0, 115.0, 10.0, 20.0)
        );
        assert_eq!(
            output_port_rect(node, 1, &m),
            Bounds::new(292.0, 165.0, 10.0, 20.0)
        );
    }

    #[test]
    fn input_recentres_when_outputs_grow() {
        let mut g = NodeGraph::new();
        let id = g.add_node(Position::new(0.0, 0.0));
        let input = g.node(id).unwrap().input_port();
        assert_eq!(port_rect(&g, input).unwrap().center().1, 25.0);
        g.add_output_port(id).unwrap();
        assert_eq!(port_rect(&g, input).unwrap().center().1, 50.0);
    }

    #[test]
    fn input_port_stays_pickable_without_outputs() {
        let mut g = NodeGraph::new();
        let id = g.add_node(Position::new(0.0, 0.0));
        let out = g.node(id).unwrap().output_ports()[0];
        let input = g.node(id).unwrap().input_port();
        g.remove_output_port(id, out).unwrap();

        assert_eq!(g.node(id).unwrap().bounds().height, 0.0);
        assert_eq!(port_rect(&g, input).unwrap().center().1, 0.0);
        assert_eq!(hit_test(&g, 0.0, 0.0, &WireStyle::default()), Hit::Port(input));
    }

    #[test]
    fn topmost_node_wins() {
        let mut g = NodeGraph::new();
        let below = g.add_node(Position::new(0.0, 0.0));
        let above = g.add_node(Position::new(50.0, 10.0));
        assert_eq!(hit_test_node(&g, 60.0, 20.0), Some(above));
        assert_eq!(hit_test_node(&g, 10.0, 20.0), Some(below));
        assert_eq!(hit_test_node(&g, 500.0, 500.0), None);
    }

    #[test]
    fn ports_take_priority_over_nodes() {
        let mut g = NodeGraph::new();
        let id = g.add_node(Position::new(0.0, 0.0));
        let out = g.node(id).unwrap().output_ports()[0];
        // Inside both the node body and the output port overlap.
        assert_eq!(hit_test(&g, 195.0, 25.0, &WireStyle::default()), Hit::Port(out));
        assert_eq!(hit_test(&g, 100.0, 25.0, &WireStyle::default()), Hit::Node(id));
        assert_eq!(hit_test(&g, -50.0, 0.0, &WireStyle::default()), Hit::Background);
    }

    #[test]
    fn wire_handle_is_hit_between_nodes() {
        let mut g = NodeGraph::new();
        let a = g.add_node(Position::new(0.0, 0.0));
        let b = g.add_node(Position::new(400.0, 0.0));
        let out = g.node(a).unwrap().output_ports()[0];
        let input = g.node(b).unwrap().input_port();
        g.connect(input, out).unwrap();

        let from = port_anchor(&g, out).unwrap();
        let to = port_anchor(&g, input).unwrap();
        let mid_x = ((from.x + to.x) / 2.0) as f32;
        assert_eq!(
            hit_test(&g, mid_x, 25.0, &WireStyle::default()),
            Hit::Wire(Connection::new(input, out))
        );
    }
}
