pub mod commands;
pub mod connect;
pub mod controller;
pub mod input;
pub mod interact;
pub mod session;
pub mod shortcuts;

pub use commands::{ContextMenu, EditorCommand, MenuItem};
pub use connect::{ConnectOutcome, ConnectState, ConnectionAuthoring};
pub use controller::{GraphController, Response};
pub use input::{KeyEvent, PointerButton, PointerEvent, PointerKind};
pub use session::{DocumentStore, EditorSession, FileStore, MemoryStore};
pub use shortcuts::{ShortcutAction, ShortcutMap};
