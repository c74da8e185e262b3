//! Editor sessions: the active document and where it is persisted.
//!
//! The [`NodeGraph`](ng_core::NodeGraph) inside the controller is the only
//! live copy of the document. A [`Document`] is produced from it whenever
//! the session saves, so the saved state and the editor state cannot drift.

use crate::controller::GraphController;
use crate::input::KeyEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use ng_core::{Document, DocumentError, LintDiagnostic, NodeMetrics};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Persistence collaborator.
pub trait DocumentStore {
    /// # Errors
    /// Backend or codec failures.
    fn load(&mut self) -> Result<Document, DocumentError>;

    /// # Errors
    /// Backend or codec failures.
    fn save(&mut self, doc: &Document) -> Result<(), DocumentError>;

    /// Short label for log messages.
    fn describe(&self) -> String {
        "document".to_string()
    }
}

// ─── File store ──────────────────────────────────────────────────────────

/// A document file; the codec follows the extension (`.json`, `.ngb`, `.ng`).
/// A missing file loads as an empty document.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileStore {
    fn load(&mut self) -> Result<Document, DocumentError> {
        match Document::read(&self.path) {
            Err(DocumentError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} does not exist yet, starting empty", self.path.display());
                Ok(Document::default())
            }
            other => other,
        }
    }

    fn save(&mut self, doc: &Document) -> Result<(), DocumentError> {
        doc.write(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ─── Memory store ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MemorySlot {
    document: Document,
    saves: usize,
}

/// In-memory store. Clones share the same slot, so a host (or a test) can
/// keep a handle and observe what the session saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<MemorySlot>>,
}

impl MemoryStore {
    pub fn new(document: Document) -> Self {
        Self {
            slot: Rc::new(RefCell::new(MemorySlot { document, saves: 0 })),
        }
    }

    /// The last saved (or initial) document.
    pub fn document(&self) -> Document {
        self.slot.borrow().document.clone()
    }

    pub fn save_count(&self) -> usize {
        self.slot.borrow().saves
    }
}

impl DocumentStore for MemoryStore {
    fn load(&mut self) -> Result<Document, DocumentError> {
        Ok(self.document())
    }

    fn save(&mut self, doc: &Document) -> Result<(), DocumentError> {
        let mut slot = self.slot.borrow_mut();
        slot.document = doc.clone();
        slot.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

// ─── Session ─────────────────────────────────────────────────────────────

/// The active editor: a controller plus the store its document came from.
pub struct EditorSession {
    controller: GraphController,
    store: Option<Box<dyn DocumentStore>>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self::with_metrics(NodeMetrics::default())
    }

    pub fn with_metrics(metrics: NodeMetrics) -> Self {
        Self {
            controller: GraphController::with_metrics(metrics),
            store: None,
        }
    }

    pub fn controller(&self) -> &GraphController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut GraphController {
        &mut self.controller
    }

    pub fn is_open(&self) -> bool {
        self.store.is_some()
    }

    /// Swap in another document.
    ///
    /// The outgoing document is saved first. If the new store fails to load,
    /// the outgoing document stays active. On success all derived state
    /// (nodes, connections, pending selection, drag state) is rebuilt from
    /// the new document.
    ///
    /// # Errors
    /// Saving the outgoing document or loading the new one failed.
    pub fn open(
        &mut self,
        mut store: Box<dyn DocumentStore>,
    ) -> Result<Vec<LintDiagnostic>, DocumentError> {
        self.save()?;
        let doc = store.load()?;
        let diagnostics = self.controller.rebuild_from_document(&doc);
        log::info!(
            "opened {} ({} node(s), {} diagnostic(s))",
            store.describe(),
            self.controller.graph().len(),
            diagnostics.len()
        );
        self.store = Some(store);
        Ok(diagnostics)
    }

    /// Save the active document. Returns `false` if nothing is open.
    ///
    /// # Errors
    /// The store failed to save.
    pub fn save(&mut self) -> Result<bool, DocumentError> {
        let Some(store) = self.store.as_mut() else {
            return Ok(false);
        };
        store.save(&self.controller.to_document())?;
        log::debug!("saved {}", store.describe());
        Ok(true)
    }

    /// Save and detach the active document, leaving an empty editor.
    ///
    /// # Errors
    /// The store failed to save; the document stays open.
    pub fn close(&mut self) -> Result<(), DocumentError> {
        self.save()?;
        self.store = None;
        self.controller.clear();
        Ok(())
    }

    /// Resolve and apply a keyboard shortcut. Returns `true` if anything
    /// changed or was saved.
    ///
    /// # Errors
    /// Only `Save` can fail.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<bool, DocumentError> {
        let Some(action) = ShortcutMap::resolve(&key.key, key.ctrl, key.shift, key.alt, key.meta)
        else {
            return Ok(false);
        };
        match action {
            ShortcutAction::Save => self.save(),
            other => Ok(self.controller.apply_shortcut(other)),
        }
    }
}
