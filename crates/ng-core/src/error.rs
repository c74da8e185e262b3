//! Error types for graph mutations and document codecs.

use crate::id::{NodeId, PortId};
use std::fmt;

/// Failure of a graph mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The operation named a node that is not in the graph.
    NodeNotFound(NodeId),
    /// The operation named a port that is not in the graph (or not on the given node).
    PortNotFound(PortId),
    /// The arguments are well-formed but the operation is not allowed
    /// (self-loop, port of the wrong role).
    InvalidArgument(String),
    /// Inserting the record would break referential integrity
    /// (duplicate node or port id).
    IntegrityViolation(String),
}

impl GraphError {
    /// `true` for the `NotFound` family, which remove-style callers treat as a no-op.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::PortNotFound(_))
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node {id} not found"),
            Self::PortNotFound(id) => write!(f, "port {id} not found"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::IntegrityViolation(msg) => write!(f, "integrity violation: {msg}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Failure to encode, decode, read, or write a persisted document.
#[derive(Debug)]
pub enum DocumentError {
    Json(serde_json::Error),
    MessagePackEncode(rmp_serde::encode::Error),
    MessagePackDecode(rmp_serde::decode::Error),
    /// `.ng` text format parse error.
    Text(String),
    Io(std::io::Error),
    /// File extension does not map to a known codec.
    UnknownFormat(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::MessagePackEncode(e) => write!(f, "MessagePack encode error: {e}"),
            Self::MessagePackDecode(e) => write!(f, "MessagePack decode error: {e}"),
            Self::Text(e) => write!(f, "parse error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnknownFormat(ext) => write!(f, "unknown document format `{ext}`"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::MessagePackEncode(e) => Some(e),
            Self::MessagePackDecode(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Text(_) | Self::UnknownFormat(_) => None,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<rmp_serde::encode::Error> for DocumentError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Self::MessagePackEncode(e)
    }
}

impl From<rmp_serde::decode::Error> for DocumentError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Self::MessagePackDecode(e)
    }
}

impl From<std::io::Error> for DocumentError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
