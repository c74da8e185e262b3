//! Node-graph document model.
//!
//! Nodes live in a petgraph `StableDiGraph`; connections are its edges,
//! directed from the node owning the output port to the node owning the
//! input port. Deleting a petgraph node drops its incident edges, so a node
//! removal cascades to every connection touching any of its ports.
//!
//! Ports are not stored as objects. A node carries its port IDs, and a
//! [`Port`] is a computed view resolved through `port_index`.

use crate::error::GraphError;
use crate::geometry::{Bounds, NodeMetrics, Position};
use crate::id::{NodeId, PortId};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Ports & Connections ─────────────────────────────────────────────────

/// Which side of a node a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortRole {
    In,
    Out,
}

/// Computed view of a port. Geometry is derived from the owning node
/// on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port {
    pub id: PortId,
    /// Owning node (an id lookup, not a reference).
    pub node: NodeId,
    pub role: PortRole,
    /// Display index. Always 0 for the input port.
    pub index: usize,
}

/// A directed edge from an output port to an input port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "inputPortId")]
    pub input: PortId,
    #[serde(rename = "outputPortId")]
    pub output: PortId,
}

impl Connection {
    pub const fn new(input: PortId, output: PortId) -> Self {
        Self { input, output }
    }

    /// `true` if either end is `port`.
    pub fn touches(&self, port: PortId) -> bool {
        self.input == port || self.output == port
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A node on the canvas: one input port, an ordered list of output ports.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    /// Transient: highlighted by the last primary press. Never persisted.
    pub is_selected: bool,
    /// Transient: follows pointer drags. Never persisted.
    pub is_dragged: bool,
    bounds: Bounds,
    input_port: PortId,
    output_ports: SmallVec<[PortId; 4]>,
}

impl Node {
    /// Build a node from persisted parts. Height is re-derived once the
    /// node is inserted into a graph.
    pub fn new(
        id: NodeId,
        bounds: Bounds,
        title: impl Into<String>,
        input_port: PortId,
        output_ports: impl IntoIterator<Item = PortId>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            is_selected: false,
            is_dragged: false,
            bounds,
            input_port,
            output_ports: output_ports.into_iter().collect(),
        }
    }

    /// A fresh node at `position` with newly minted ids, one input and one output.
    pub fn spawn(position: Position, metrics: &NodeMetrics) -> Self {
        Self::new(
            NodeId::generate(),
            Bounds::new(
                position.x,
                position.y,
                metrics.node_width,
                metrics.node_height(1),
            ),
            metrics.default_title.clone(),
            PortId::generate(),
            [PortId::generate()],
        )
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn input_port(&self) -> PortId {
        self.input_port
    }

    /// Output ports in display order.
    pub fn output_ports(&self) -> &[PortId] {
        &self.output_ports
    }

    /// Display index of `port` among this node's outputs.
    pub fn output_index(&self, port: PortId) -> Option<usize> {
        self.output_ports.iter().position(|p| *p == port)
    }

    /// `true` if `port` is this node's input or one of its outputs.
    pub fn owns_port(&self, port: PortId) -> bool {
        self.input_port == port || self.output_ports.contains(&port)
    }

    /// Every port id this node owns, input first.
    pub fn port_ids(&self) -> impl Iterator<Item = PortId> + '_ {
        std::iter::once(self.input_port).chain(self.output_ports.iter().copied())
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.bounds.translate(dx, dy);
    }
}

/// Where a port lives inside the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PortSlot {
    node: NodeIndex,
    role: PortRole,
}

// ─── Node Graph ──────────────────────────────────────────────────────────

/// The graph aggregate: owns every node and connection and keeps
/// port identities consistent across all mutations.
#[derive(Debug, Clone)]
pub struct NodeGraph {
    graph: StableDiGraph<Node, Connection>,
    /// Nodes in insertion order. Last = topmost.
    order: Vec<NodeIndex>,
    /// Connection edges in insertion order.
    wires: Vec<EdgeIndex>,
    id_index: HashMap<NodeId, NodeIndex>,
    port_index: HashMap<PortId, PortSlot>,
    metrics: NodeMetrics,
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeGraph {
    /// Create an empty graph with default metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::with_metrics(NodeMetrics::default())
    }

    #[must_use]
    pub fn with_metrics(metrics: NodeMetrics) -> Self {
        Self {
            graph: StableDiGraph::new(),
            order: Vec::new(),
            wires: Vec::new(),
            id_index: HashMap::new(),
            port_index: HashMap::new(),
            metrics,
        }
    }

    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every node and connection. Metrics are kept.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.order.clear();
        self.wires.clear();
        self.id_index.clear();
        self.port_index.clear();
    }

    // ─── Lookup ──────────────────────────────────────────────────────────

    /// Nodes bottom-to-top (insertion order).
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> + '_ {
        self.order.iter().map(move |&idx| &self.graph[idx])
    }

    /// Node ids bottom-to-top.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|n| n.id).collect()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Mutable access for title, selection, drag state, and position.
    /// Port lists can only change through the graph.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn contains_port(&self, port: PortId) -> bool {
        self.port_index.contains_key(&port)
    }

    /// Resolve a port id into its computed view.
    pub fn port(&self, id: PortId) -> Option<Port> {
        let slot = self.port_index.get(&id)?;
        let node = &self.graph[slot.node];
        let index = match slot.role {
            PortRole::In => 0,
            PortRole::Out => node.output_index(id)?,
        };
        Some(Port {
            id,
            node: node.id,
            role: slot.role,
            index,
        })
    }

    /// The node that owns `port`.
    pub fn owner_of(&self, port: PortId) -> Option<NodeId> {
        self.port_index
            .get(&port)
            .map(|slot| self.graph[slot.node].id)
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.wires.iter().filter_map(move |e| self.graph.edge_weight(*e))
    }

    pub fn connection_count(&self) -> usize {
        self.wires.len()
    }

    /// The connection attached to an output port, if any (at most one).
    pub fn connection_on(&self, output: PortId) -> Option<Connection> {
        self.connections().find(|c| c.output == output).copied()
    }

    /// All connections feeding an input port (fan-in is unbounded).
    pub fn connections_into(&self, input: PortId) -> Vec<Connection> {
        self.connections()
            .filter(|c| c.input == input)
            .copied()
            .collect()
    }

    /// Nodes fed by `id`'s outputs, deduplicated, in connection order.
    pub fn downstream(&self, id: NodeId) -> Vec<NodeId> {
        self.neighbors(id, petgraph::Direction::Outgoing)
    }

    /// Nodes feeding `id`'s input, deduplicated, in connection order.
    pub fn upstream(&self, id: NodeId) -> Vec<NodeId> {
        self.neighbors(id, petgraph::Direction::Incoming)
    }

    fn neighbors(&self, id: NodeId, dir: petgraph::Direction) -> Vec<NodeId> {
        let Some(&idx) = self.id_index.get(&id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for &e in &self.wires {
            let Some((from, to)) = self.graph.edge_endpoints(e) else {
                continue;
            };
            let other = match dir {
                petgraph::Direction::Outgoing if from == idx => to,
                petgraph::Direction::Incoming if to == idx => from,
                _ => continue,
            };
            let other_id = self.graph[other].id;
            if !out.contains(&other_id) {
                out.push(other_id);
            }
        }
        out
    }

    // ─── Node mutations ──────────────────────────────────────────────────

    /// Create a node at `position` with one input and one output port.
    pub fn add_node(&mut self, position: Position) -> NodeId {
        let node = Node::spawn(position, &self.metrics);
        let id = node.id;
        self.attach(node);
        log::debug!("added node {id} at ({}, {})", position.x, position.y);
        id
    }

    /// Insert a fully formed node, keeping its ids.
    ///
    /// # Errors
    /// `IntegrityViolation` if the node id or any of its port ids is already
    /// in use (or repeated within the node itself).
    pub fn insert_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        if self.id_index.contains_key(&node.id) {
            return Err(GraphError::IntegrityViolation(format!(
                "duplicate node id {}",
                node.id
            )));
        }
        let mut seen = Vec::with_capacity(node.output_ports.len() + 1);
        for port in node.port_ids() {
            if self.port_index.contains_key(&port) || seen.contains(&port) {
                return Err(GraphError::IntegrityViolation(format!(
                    "port {port} on node {} is already in use",
                    node.id
                )));
            }
            seen.push(port);
        }
        let id = node.id;
        self.attach(node);
        Ok(id)
    }

    fn attach(&mut self, node: Node) -> NodeIndex {
        let id = node.id;
        let input = node.input_port;
        let outputs = node.output_ports.clone();
        let idx = self.graph.add_node(node);
        self.order.push(idx);
        self.id_index.insert(id, idx);
        self.port_index.insert(
            input,
            PortSlot {
                node: idx,
                role: PortRole::In,
            },
        );
        for port in outputs {
            self.port_index.insert(
                port,
                PortSlot {
                    node: idx,
                    role: PortRole::Out,
                },
            );
        }
        self.refresh_height(idx);
        idx
    }

    /// Remove a node and every connection touching any of its ports.
    /// Returns `None` (no-op) if the node is unknown.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.id_index.remove(&id)?;
        let before = self.wires.len();
        let node = self.graph.remove_node(idx)?;
        self.wires.retain(|e| self.graph.edge_weight(*e).is_some());
        self.order.retain(|i| *i != idx);
        for port in node.port_ids() {
            self.port_index.remove(&port);
        }
        log::debug!(
            "removed node {id} and {} connection(s)",
            before - self.wires.len()
        );
        Some(node)
    }

    /// Move a node by a delta. Returns `false` if the node is unknown.
    pub fn translate_node(&mut self, id: NodeId, dx: f32, dy: f32) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.translate(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Translate every node (canvas pan).
    pub fn pan(&mut self, dx: f32, dy: f32) {
        for &idx in &self.order {
            self.graph[idx].translate(dx, dy);
        }
    }

    // ─── Port mutations ──────────────────────────────────────────────────

    /// Append a new output port to a node.
    ///
    /// # Errors
    /// `NodeNotFound` if the node is unknown.
    pub fn add_output_port(&mut self, node: NodeId) -> Result<PortId, GraphError> {
        let idx = self.index_of(node)?;
        let port = PortId::generate();
        self.graph[idx].output_ports.push(port);
        self.port_index.insert(
            port,
            PortSlot {
                node: idx,
                role: PortRole::Out,
            },
        );
        self.refresh_height(idx);
        log::debug!("added output {port} to {node}");
        Ok(port)
    }

    /// Remove one output port, first dropping the connection attached to it.
    /// Any index is removable, including the first.
    ///
    /// Returns the connection that was dropped, if any.
    ///
    /// # Errors
    /// `NodeNotFound` / `PortNotFound` if the node is unknown or does not
    /// own `port` as an output.
    pub fn remove_output_port(
        &mut self,
        node: NodeId,
        port: PortId,
    ) -> Result<Option<Connection>, GraphError> {
        let idx = self.index_of(node)?;
        let pos = self.graph[idx]
            .output_index(port)
            .ok_or(GraphError::PortNotFound(port))?;
        let dropped = self.detach_output(port);
        self.graph[idx].output_ports.remove(pos);
        self.port_index.remove(&port);
        self.refresh_height(idx);
        log::debug!("removed output {port} from {node}");
        Ok(dropped)
    }

    fn refresh_height(&mut self, idx: NodeIndex) {
        let height = self
            .metrics
            .node_height(self.graph[idx].output_ports.len());
        self.graph[idx].bounds.height = height;
    }

    fn index_of(&self, id: NodeId) -> Result<NodeIndex, GraphError> {
        self.id_index
            .get(&id)
            .copied()
            .ok_or(GraphError::NodeNotFound(id))
    }

    fn slot(&self, port: PortId, role: PortRole) -> Result<PortSlot, GraphError> {
        let slot = *self
            .port_index
            .get(&port)
            .ok_or(GraphError::PortNotFound(port))?;
        if slot.role != role {
            return Err(GraphError::InvalidArgument(format!(
                "port {port} is not an {} port",
                match role {
                    PortRole::In => "input",
                    PortRole::Out => "output",
                }
            )));
        }
        Ok(slot)
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Check that `connect(input, output)` would succeed, without mutating.
    ///
    /// # Errors
    /// Same as [`NodeGraph::connect`].
    pub fn can_connect(&self, input: PortId, output: PortId) -> Result<(), GraphError> {
        let in_slot = self.slot(input, PortRole::In)?;
        let out_slot = self.slot(output, PortRole::Out)?;
        if in_slot.node == out_slot.node {
            return Err(GraphError::InvalidArgument(format!(
                "cannot connect {output} to {input}: both belong to {}",
                self.graph[in_slot.node].id
            )));
        }
        Ok(())
    }

    /// Connect `output` to `input`. An output holds at most one connection:
    /// any previous connection on `output` is removed first and returned.
    ///
    /// # Errors
    /// - `PortNotFound` if either port is unknown
    /// - `InvalidArgument` if a port has the wrong role or both ports
    ///   belong to the same node
    pub fn connect(
        &mut self,
        input: PortId,
        output: PortId,
    ) -> Result<Option<Connection>, GraphError> {
        self.can_connect(input, output)?;
        let in_node = self.port_index[&input].node;
        let out_node = self.port_index[&output].node;

        let replaced = self.detach_output(output);
        let connection = Connection::new(input, output);
        let edge = self.graph.add_edge(out_node, in_node, connection);
        self.wires.push(edge);
        log::debug!("connected {output} -> {input}");
        Ok(replaced)
    }

    /// Remove the first connection equal to `connection` (insertion order).
    /// Returns `false` if none matched.
    pub fn disconnect(&mut self, connection: &Connection) -> bool {
        let Some(pos) = self
            .wires
            .iter()
            .position(|e| self.graph.edge_weight(*e) == Some(connection))
        else {
            return false;
        };
        let edge = self.wires.remove(pos);
        self.graph.remove_edge(edge);
        log::debug!("disconnected {} -> {}", connection.output, connection.input);
        true
    }

    fn detach_output(&mut self, output: PortId) -> Option<Connection> {
        let pos = self
            .wires
            .iter()
            .position(|e| self.graph.edge_weight(*e).is_some_and(|c| c.output == output))?;
        let edge = self.wires.remove(pos);
        self.graph.remove_edge(edge)
    }

    /// Verify every structural invariant. Used by tests and diagnostics.
    ///
    /// # Errors
    /// `IntegrityViolation` describing the first broken invariant.
    pub fn check_integrity(&self) -> Result<(), GraphError> {
        let fail = |msg: String| -> Result<(), GraphError> {
            Err(GraphError::IntegrityViolation(msg))
        };
        let mut outputs_seen = Vec::new();
        for c in self.connections() {
            if self.slot(c.input, PortRole::In).is_err() {
                return fail(format!("connection input {} is not an input port", c.input));
            }
            if self.slot(c.output, PortRole::Out).is_err() {
                return fail(format!("connection output {} is not an output port", c.output));
            }
            if outputs_seen.contains(&c.output) {
                return fail(format!("output {} has more than one connection", c.output));
            }
            outputs_seen.push(c.output);
        }
        for node in self.nodes() {
            let expected = self.metrics.node_height(node.output_ports.len());
            if node.bounds.height != expected {
                return fail(format!("node {} height is not derived", node.id));
            }
        }
        Ok(())
    }
}
