//! Editor commands and the context menus that offer them.
//!
//! Menus are plain data: each entry carries the command it stands for, and
//! the host hands the chosen one back to
//! [`GraphController::execute`](crate::controller::GraphController::execute).

use ng_core::{Connection, NodeId, PortId, Position};

/// A discrete editing command, as issued from a menu, shortcut, or inspector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorCommand {
    AddNodeAt { x: f32, y: f32 },
    RemoveNode { id: NodeId },
    AddOutput { id: NodeId },
    RemoveOutput { id: NodeId, port: PortId },
    Disconnect(Connection),
}

/// One entry of a context menu or inspector panel.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub label: String,
    pub command: EditorCommand,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, command: EditorCommand) -> Self {
        Self {
            label: label.into(),
            command,
        }
    }
}

/// A context menu requested at a canvas position.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub position: Position,
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    /// "Add Node" at the pointer.
    pub fn canvas(x: f32, y: f32) -> Self {
        Self {
            position: Position::new(x, y),
            items: vec![MenuItem::new("Add Node", EditorCommand::AddNodeAt { x, y })],
        }
    }

    /// "Remove Node" for a selected node.
    pub fn node(id: NodeId, x: f32, y: f32) -> Self {
        Self {
            position: Position::new(x, y),
            items: vec![MenuItem::new("Remove Node", EditorCommand::RemoveNode { id })],
        }
    }

    /// Find the entry with the given label.
    pub fn item(&self, label: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.label == label)
    }
}
