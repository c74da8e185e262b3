//! Graph controller: the facade hosts talk to.
//!
//! Owns the [`NodeGraph`] and the connection-authoring state, routes pointer
//! events to ports, wire handles, and nodes, and executes editor commands.
//! Every entry point reports whether a redraw is needed instead of setting
//! a global dirty flag.
//!
//! Remove-style commands on unknown ids are no-ops. A refused connect
//! simply clears the pending selection.

use crate::commands::{ContextMenu, EditorCommand, MenuItem};
use crate::connect::{ConnectOutcome, ConnectState, ConnectionAuthoring};
use crate::input::{PointerButton, PointerEvent, PointerKind};
use crate::interact::process_node_events;
use crate::shortcuts::ShortcutAction;
use kurbo::Point;
use ng_core::{
    Connection, Document, LintDiagnostic, NodeGraph, NodeId, NodeMetrics, PortId, Position,
};
use ng_render::{Hit, Painter, PendingWire, WireStyle, hit_test, paint_graph};

/// Outcome of one pointer event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub redraw: bool,
    /// A context menu the host should show.
    pub menu: Option<ContextMenu>,
}

impl Response {
    fn redraw(redraw: bool) -> Self {
        Self { redraw, menu: None }
    }
}

#[derive(Debug, Clone)]
pub struct GraphController {
    graph: NodeGraph,
    authoring: ConnectionAuthoring,
    wire_style: WireStyle,
    cursor: Position,
}

impl Default for GraphController {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphController {
    pub fn new() -> Self {
        Self::with_metrics(NodeMetrics::default())
    }

    pub fn with_metrics(metrics: NodeMetrics) -> Self {
        Self {
            graph: NodeGraph::with_metrics(metrics),
            authoring: ConnectionAuthoring::new(),
            wire_style: WireStyle::default(),
            cursor: Position::default(),
        }
    }

    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    pub fn connect_state(&self) -> ConnectState {
        self.authoring.state()
    }

    pub fn wire_style(&self) -> &WireStyle {
        &self.wire_style
    }

    pub fn set_wire_style(&mut self, style: WireStyle) {
        self.wire_style = style;
    }

    /// The selected node, topmost first if several are flagged.
    pub fn selected(&self) -> Option<NodeId> {
        self.graph.nodes().rev().find(|n| n.is_selected).map(|n| n.id)
    }

    // ─── Commands ────────────────────────────────────────────────────────

    pub fn add_node_at(&mut self, x: f32, y: f32) -> NodeId {
        self.graph.add_node(Position::new(x, y))
    }

    /// Remove a node and its connections, dropping any pending selection
    /// on its ports. Unknown ids are a no-op.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.graph.node(id) else {
            log::debug!("remove_node: {id} not found");
            return false;
        };
        let ports: Vec<PortId> = node.port_ids().collect();
        self.authoring.forget_ports(ports);
        self.graph.remove_node(id).is_some()
    }

    pub fn add_output(&mut self, id: NodeId) -> Option<PortId> {
        match self.graph.add_output_port(id) {
            Ok(port) => Some(port),
            Err(e) => {
                log::debug!("add_output: {e}");
                None
            }
        }
    }

    /// Remove one output port and its connection. Unknown ids are a no-op.
    pub fn remove_output(&mut self, id: NodeId, port: PortId) -> bool {
        match self.graph.remove_output_port(id, port) {
            Ok(_) => {
                self.authoring.forget_ports([port]);
                true
            }
            Err(e) => {
                log::debug!("remove_output: {e}");
                false
            }
        }
    }

    pub fn disconnect(&mut self, connection: &Connection) -> bool {
        self.graph.disconnect(connection)
    }

    /// Execute a menu or inspector command. Returns `true` if the graph changed.
    pub fn execute(&mut self, command: EditorCommand) -> bool {
        log::trace!("execute {command:?}");
        match command {
            EditorCommand::AddNodeAt { x, y } => {
                self.add_node_at(x, y);
                true
            }
            EditorCommand::RemoveNode { id } => self.remove_node(id),
            EditorCommand::AddOutput { id } => self.add_output(id).is_some(),
            EditorCommand::RemoveOutput { id, port } => self.remove_output(id, port),
            EditorCommand::Disconnect(c) => self.disconnect(&c),
        }
    }

    /// Inspector entries for a node: "Add Output", then "Remove Output N"
    /// for every output after the first.
    pub fn output_actions(&self, id: NodeId) -> Vec<MenuItem> {
        let Some(node) = self.graph.node(id) else {
            return Vec::new();
        };
        let mut items = vec![MenuItem::new("Add Output", EditorCommand::AddOutput { id })];
        for (i, &port) in node.output_ports().iter().enumerate().skip(1) {
            items.push(MenuItem::new(
                format!("Remove Output {}", i + 1),
                EditorCommand::RemoveOutput { id, port },
            ));
        }
        items
    }

    /// Apply a resolved keyboard shortcut. `Save` is left to the session.
    pub fn apply_shortcut(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::CancelConnection => {
                let was_pending = self.authoring.is_pending();
                self.authoring.click_background();
                was_pending
            }
            ShortcutAction::RemoveSelected => {
                self.selected().is_some_and(|id| self.remove_node(id))
            }
            ShortcutAction::AddOutput => self
                .selected()
                .is_some_and(|id| self.add_output(id).is_some()),
            ShortcutAction::RemoveLastOutput => {
                let Some(id) = self.selected() else {
                    return false;
                };
                let last = self
                    .graph
                    .node(id)
                    .filter(|n| n.output_ports().len() > 1)
                    .and_then(|n| n.output_ports().last().copied());
                last.is_some_and(|port| self.remove_output(id, port))
            }
            ShortcutAction::Save => false,
        }
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Route one pointer event.
    ///
    /// Primary press: port → connection authoring; wire handle → disconnect;
    /// otherwise the pending selection clears and nodes get the event.
    /// Secondary press: a selected node's remove menu, else the canvas menu.
    /// Middle drag: pan.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Response {
        self.cursor = Position::new(event.x, event.y);
        let pending = self.authoring.is_pending();

        let mut response = match (event.kind, event.button) {
            (PointerKind::Press, PointerButton::Primary) => self.primary_press(event),
            (PointerKind::Press, PointerButton::Secondary) => {
                let gesture = process_node_events(&mut self.graph, event);
                Response {
                    redraw: gesture.redraw,
                    menu: Some(
                        gesture
                            .menu
                            .unwrap_or_else(|| ContextMenu::canvas(event.x, event.y)),
                    ),
                }
            }
            (PointerKind::Drag, PointerButton::Middle) => {
                self.graph.pan(event.dx, event.dy);
                Response::redraw(true)
            }
            _ => Response::redraw(process_node_events(&mut self.graph, event).redraw),
        };

        // The preview wire follows the pointer.
        response.redraw |= pending || self.authoring.is_pending();
        response
    }

    fn primary_press(&mut self, event: &PointerEvent) -> Response {
        match hit_test(&self.graph, event.x, event.y, &self.wire_style) {
            Hit::Port(port) => {
                let outcome = self.authoring.click_port(&mut self.graph, port);
                if let ConnectOutcome::Connected { replaced: Some(old), .. } = outcome {
                    log::debug!("replaced {} -> {}", old.output, old.input);
                }
                Response::redraw(true)
            }
            Hit::Wire(connection) => {
                self.authoring.click_background();
                Response::redraw(self.graph.disconnect(&connection))
            }
            Hit::Node(_) | Hit::Background => {
                self.authoring.click_background();
                Response::redraw(process_node_events(&mut self.graph, event).redraw)
            }
        }
    }

    // ─── Documents & painting ────────────────────────────────────────────

    /// Drop every node, connection, and pending selection.
    pub fn clear(&mut self) {
        self.authoring = ConnectionAuthoring::new();
        self.graph.clear();
    }

    /// Replace the graph with one rebuilt from `doc`. Pending selections are
    /// cleared first. Returns the load diagnostics.
    pub fn rebuild_from_document(&mut self, doc: &Document) -> Vec<LintDiagnostic> {
        self.clear();
        let report = NodeGraph::from_document_with(doc, self.graph.metrics().clone());
        self.graph = report.graph;
        log::debug!(
            "rebuilt {} node(s), {} connection(s)",
            self.graph.len(),
            self.graph.connection_count()
        );
        report.diagnostics
    }

    pub fn to_document(&self) -> Document {
        self.graph.to_document()
    }

    /// Paint the graph, including the preview wire while a port is pending.
    pub fn paint(&self, painter: &mut dyn Painter) {
        let pending = self.authoring.pending_port().map(|port| PendingWire {
            port,
            cursor: Point::new(f64::from(self.cursor.x), f64::from(self.cursor.y)),
        });
        paint_graph(painter, &self.graph, pending, &self.wire_style);
    }
}
