//! Input abstraction layer.
//!
//! The host normalizes its raw window events into these types before
//! handing them to the [`GraphController`](crate::controller::GraphController).

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Release,
    Drag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A normalized pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub button: PointerButton,
    pub x: f32,
    pub y: f32,
    /// Movement since the previous event. Only meaningful for `Drag`.
    pub dx: f32,
    pub dy: f32,
}

impl PointerEvent {
    pub fn press(button: PointerButton, x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Press,
            button,
            x,
            y,
            dx: 0.0,
            dy: 0.0,
        }
    }

    pub fn release(button: PointerButton, x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Release,
            button,
            x,
            y,
            dx: 0.0,
            dy: 0.0,
        }
    }

    pub fn drag(button: PointerButton, x: f32, y: f32, dx: f32, dy: f32) -> Self {
        Self {
            kind: PointerKind::Drag,
            button,
            x,
            y,
            dx,
            dy,
        }
    }
}

/// A keyboard event. `key` is the platform key name (e.g. `"s"`, `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyEvent {
    /// A key pressed with no modifiers.
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        }
    }
}
