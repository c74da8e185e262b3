pub mod document;
pub mod error;
pub mod geometry;
pub mod id;
pub mod lint;
pub mod model;
pub mod text;

pub use document::{Document, DocumentFormat, LoadReport, NodeRecord};
pub use error::{DocumentError, GraphError};
pub use geometry::{Bounds, NodeMetrics, Position};
pub use id::{NodeId, PortId};
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use model::*;
pub use text::{emit_document, parse_document};
