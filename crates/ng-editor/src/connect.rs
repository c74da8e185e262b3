//! Connection authoring: resolves port click sequences into connections.
//!
//! The user may click ports in either order. A click records the port as
//! pending; a click on the complementary role completes the connection.
//! Both ends are only ever pending for the duration of one transition.
//!
//! | State              | Click input `P`                | Click output `Q`                | Background |
//! |--------------------|--------------------------------|---------------------------------|------------|
//! | `Idle`             | `InputPending(P)`              | `OutputPending(Q)`              | `Idle`     |
//! | `InputPending(I)`  | `InputPending(P)`              | connect `Q → I`, `Idle`         | `Idle`     |
//! | `OutputPending(O)` | connect `O → P`, `Idle`        | `OutputPending(Q)`              | `Idle`     |

use ng_core::{Connection, NodeGraph, PortId, PortRole};

/// Pending port selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectState {
    #[default]
    Idle,
    InputPending(PortId),
    OutputPending(PortId),
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// The port is now pending.
    Selected(PortId),
    /// A connection formed. `replaced` is the wire previously on that output.
    Connected {
        connection: Connection,
        replaced: Option<Connection>,
    },
    /// Both ends were known but the graph refused them (same node, stale port).
    Rejected,
    /// Pending selection cleared.
    Cleared,
}

/// The connection-authoring state machine.
#[derive(Debug, Clone, Default)]
pub struct ConnectionAuthoring {
    state: ConnectState,
}

impl ConnectionAuthoring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectState {
        self.state
    }

    /// The pending port, whichever role it has.
    pub fn pending_port(&self) -> Option<PortId> {
        match self.state {
            ConnectState::Idle => None,
            ConnectState::InputPending(p) | ConnectState::OutputPending(p) => Some(p),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state != ConnectState::Idle
    }

    /// Click on an input port.
    pub fn click_input(&mut self, graph: &mut NodeGraph, port: PortId) -> ConnectOutcome {
        match self.state {
            ConnectState::OutputPending(output) => {
                self.state = ConnectState::Idle;
                complete(graph, port, output)
            }
            ConnectState::Idle | ConnectState::InputPending(_) => {
                self.state = ConnectState::InputPending(port);
                log::trace!("input {port} pending");
                ConnectOutcome::Selected(port)
            }
        }
    }

    /// Click on an output port. An existing wire on `port` is only replaced
    /// once the connection actually completes.
    pub fn click_output(&mut self, graph: &mut NodeGraph, port: PortId) -> ConnectOutcome {
        match self.state {
            ConnectState::InputPending(input) => {
                self.state = ConnectState::Idle;
                complete(graph, input, port)
            }
            ConnectState::Idle | ConnectState::OutputPending(_) => {
                self.state = ConnectState::OutputPending(port);
                log::trace!("output {port} pending");
                ConnectOutcome::Selected(port)
            }
        }
    }

    /// Click on a port, dispatching on its role. Unknown ports clear the selection.
    pub fn click_port(&mut self, graph: &mut NodeGraph, port: PortId) -> ConnectOutcome {
        match graph.port(port).map(|p| p.role) {
            Some(PortRole::In) => self.click_input(graph, port),
            Some(PortRole::Out) => self.click_output(graph, port),
            None => self.click_background(),
        }
    }

    /// Click anywhere that is not a port.
    pub fn click_background(&mut self) -> ConnectOutcome {
        self.state = ConnectState::Idle;
        ConnectOutcome::Cleared
    }

    /// Drop the pending selection if it refers to one of `ports`.
    /// Returns `true` if something was cleared.
    pub fn forget_ports(&mut self, ports: impl IntoIterator<Item = PortId>) -> bool {
        let Some(pending) = self.pending_port() else {
            return false;
        };
        if ports.into_iter().any(|p| p == pending) {
            self.state = ConnectState::Idle;
            true
        } else {
            false
        }
    }
}

fn complete(graph: &mut NodeGraph, input: PortId, output: PortId) -> ConnectOutcome {
    match graph.connect(input, output) {
        Ok(replaced) => ConnectOutcome::Connected {
            connection: Connection::new(input, output),
            replaced,
        },
        Err(e) => {
            log::trace!("connect {output} -> {input} rejected: {e}");
            ConnectOutcome::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ng_core::{NodeId, Position};
    use pretty_assertions::assert_eq;

    struct Fixture {
        graph: NodeGraph,
        nodes: Vec<NodeId>,
    }

    impl Fixture {
        fn new(count: usize) -> Self {
            let mut graph = NodeGraph::new();
            let nodes = (0..count)
                .map(|i| graph.add_node(Position::new(i as f32 * 300.0, 0.0)))
                .collect();
            Self { graph, nodes }
        }

        fn input(&self, i: usize) -> PortId {
            self.graph.node(self.nodes[i]).unwrap().input_port()
        }

        fn output(&self, i: usize) -> PortId {
            self.graph.node(self.nodes[i]).unwrap().output_ports()[0]
        }
    }

    #[test]
    fn output_then_input_connects() {
        let mut f = Fixture::new(2);
        let (o, i) = (f.output(0), f.input(1));
        let mut sm = ConnectionAuthoring::new();
        assert_eq!(sm.click_output(&mut f.graph, o), ConnectOutcome::Selected(o));
        assert_eq!(sm.state(), ConnectState::OutputPending(o));
        assert_eq!(
            sm.click_input(&mut f.graph, i),
            ConnectOutcome::Connected {
                connection: Connection::new(i, o),
                replaced: None
            }
        );
        assert_eq!(sm.state(), ConnectState::Idle);
        assert_eq!(f.graph.connection_count(), 1);
    }

    #[test]
    fn input_then_output_connects() {
        let mut f = Fixture::new(2);
        let (o, i) = (f.output(0), f.input(1));
        let mut sm = ConnectionAuthoring::new();
        sm.click_input(&mut f.graph, i);
        let outcome = sm.click_output(&mut f.graph, o);
        assert!(matches!(outcome, ConnectOutcome::Connected { .. }));
        assert_eq!(f.graph.connection_on(o), Some(Connection::new(i, o)));
    }

    #[test]
    fn same_node_is_rejected_and_returns_to_idle() {
        let mut f = Fixture::new(1);
        let (o, i) = (f.output(0), f.input(0));
        let mut sm = ConnectionAuthoring::new();
        sm.click_output(&mut f.graph, o);
        assert_eq!(sm.click_input(&mut f.graph, i), ConnectOutcome::Rejected);
        assert_eq!(sm.state(), ConnectState::Idle);
        assert_eq!(f.graph.connection_count(), 0);
    }

    #[test]
    fn reclicking_same_role_replaces_pending() {
        let mut f = Fixture::new(3);
        let (i1, i2, o0, o1) = (f.input(1), f.input(2), f.output(0), f.output(1));
        let mut sm = ConnectionAuthoring::new();
        sm.click_input(&mut f.graph, i1);
        sm.click_input(&mut f.graph, i2);
        assert_eq!(sm.state(), ConnectState::InputPending(i2));
        sm.click_output(&mut f.graph, o0);
        sm.click_output(&mut f.graph, o1);
        assert_eq!(sm.state(), ConnectState::OutputPending(o1));
    }

    #[test]
    fn selecting_an_occupied_output_keeps_its_wire_until_connect() {
        let mut f = Fixture::new(3);
        let (o, i1, i2) = (f.output(0), f.input(1), f.input(2));
        f.graph.connect(i1, o).unwrap();
        let mut sm = ConnectionAuthoring::new();
        sm.click_output(&mut f.graph, o);
        assert_eq!(f.graph.connection_on(o), Some(Connection::new(i1, o)));
        assert_eq!(
            sm.click_input(&mut f.graph, i2),
            ConnectOutcome::Connected {
                connection: Connection::new(i2, o),
                replaced: Some(Connection::new(i1, o)),
            }
        );
    }

    #[test]
    fn forget_ports_only_clears_matching() {
        let mut f = Fixture::new(2);
        let o = f.output(0);
        let mut sm = ConnectionAuthoring::new();
        sm.click_output(&mut f.graph, o);
        assert!(!sm.forget_ports([f.input(1)]));
        assert!(sm.is_pending());
        let ports: Vec<PortId> = f.graph.node(f.nodes[0]).unwrap().port_ids().collect();
        assert!(sm.forget_ports(ports));
        assert_eq!(sm.state(), ConnectState::Idle);
    }

    #[test]
    fn stale_pending_port_is_rejected() {
        let mut f = Fixture::new(2);
        let (o, i) = (f.output(0), f.input(1));
        let mut sm = ConnectionAuthoring::new();
        sm.click_output(&mut f.graph, o);
        f.graph.remove_node(f.nodes[0]);
        assert_eq!(sm.click_input(&mut f.graph, i), ConnectOutcome::Rejected);
    }
}
