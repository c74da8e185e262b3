//! Node interaction: select, drag, and the remove-node context menu.
//!
//! Nodes are visited topmost first. The first node that claims a press
//! consumes it; no node below sees it.

use crate::commands::ContextMenu;
use crate::input::{PointerButton, PointerEvent, PointerKind};
use ng_core::{NodeGraph, NodeId};

/// Result of routing one pointer event through the nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeGesture {
    /// A node claimed the event.
    pub consumed: bool,
    pub redraw: bool,
    pub menu: Option<ContextMenu>,
}

impl NodeGesture {
    fn consumed(redraw: bool) -> Self {
        Self {
            consumed: true,
            redraw,
            menu: None,
        }
    }
}

/// Route a pointer event through every node.
pub fn process_node_events(graph: &mut NodeGraph, event: &PointerEvent) -> NodeGesture {
    match (event.kind, event.button) {
        (PointerKind::Press, PointerButton::Primary) => press(graph, event.x, event.y),
        (PointerKind::Press, PointerButton::Secondary) => context(graph, event.x, event.y),
        (PointerKind::Drag, PointerButton::Primary) => drag(graph, event.dx, event.dy),
        (PointerKind::Release, PointerButton::Primary) => {
            for id in graph.node_ids() {
                if let Some(node) = graph.node_mut(id) {
                    node.is_dragged = false;
                }
            }
            NodeGesture::default()
        }
        _ => NodeGesture::default(),
    }
}

/// Primary press: the topmost node under the pointer becomes the only
/// selected and dragged node. A press on empty canvas deselects everything.
fn press(graph: &mut NodeGraph, x: f32, y: f32) -> NodeGesture {
    let hit = graph
        .nodes()
        .rev()
        .find(|n| n.bounds().contains(x, y))
        .map(|n| n.id);

    let mut changed = false;
    for id in graph.node_ids() {
        let Some(node) = graph.node_mut(id) else {
            continue;
        };
        let claimed = Some(id) == hit;
        changed |= node.is_selected != claimed;
        node.is_selected = claimed;
        node.is_dragged = claimed;
    }

    match hit {
        Some(id) => {
            log::trace!("press claimed by {id}");
            NodeGesture::consumed(true)
        }
        None => NodeGesture {
            redraw: changed,
            ..NodeGesture::default()
        },
    }
}

/// Secondary press on a selected node opens its remove menu.
fn context(graph: &NodeGraph, x: f32, y: f32) -> NodeGesture {
    let target: Option<NodeId> = graph
        .nodes()
        .rev()
        .find(|n| n.is_selected && n.bounds().contains(x, y))
        .map(|n| n.id);
    match target {
        Some(id) => NodeGesture {
            consumed: true,
            redraw: false,
            menu: Some(ContextMenu::node(id, x, y)),
        },
        None => NodeGesture::default(),
    }
}

/// Primary drag moves the dragged node by the pointer delta.
fn drag(graph: &mut NodeGraph, dx: f32, dy: f32) -> NodeGesture {
    let dragged = graph.nodes().rev().find(|n| n.is_dragged).map(|n| n.id);
    match dragged {
        Some(id) => {
            graph.translate_node(id, dx, dy);
            NodeGesture::consumed(true)
        }
        None => NodeGesture::default(),
    }
}
