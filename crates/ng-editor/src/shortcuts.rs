//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Remove the selected node.
    RemoveSelected,
    /// Drop the pending port selection.
    CancelConnection,
    /// Append an output port to the selected node.
    AddOutput,
    /// Remove the selected node's last output (the first one is kept).
    RemoveLastOutput,
    Save,
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘; elsewhere `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the platform key name (e.g. `"s"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        _shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd {
            return match key {
                "s" | "S" => Some(ShortcutAction::Save),
                _ => None,
            };
        }

        if alt {
            return None;
        }

        // Shift is ignored: "+" is typed with shift on most layouts.
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::RemoveSelected),
            "Escape" => Some(ShortcutAction::CancelConnection),
            "+" | "=" => Some(ShortcutAction::AddOutput),
            "-" => Some(ShortcutAction::RemoveLastOutput),
            _ => None,
        }
    }
}
