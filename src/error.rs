use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Node,
    Edge,
    Anchor,
    Store,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Node => "node",
            EntityKind::Edge => "edge",
            EntityKind::Anchor => "anchor",
            EntityKind::Store => "store",
        };
        f.write_str(name)
    }
}

/// Errors raised by the graph store, the resolver and the drag controller.
///
/// `InvariantViolation` means the graph itself is inconsistent. It is never
/// retried; the caller decides whether to abort or drop the offending edge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("edge {edge_id}: {detail}")]
    InvariantViolation { edge_id: String, detail: String },

    #[error("{kind} already exists: {id}")]
    Duplicate { kind: EntityKind, id: String },

    #[error("node {id} has invalid size {width}x{height}")]
    InvalidGeometry { id: String, width: f32, height: f32 },

    #[error("node {id} would sit at non-finite position ({x}, {y})")]
    NonFinitePosition { id: String, x: f32, y: f32 },
}

impl GraphError {
    pub fn not_found(kind: EntityKind, id: &str) -> Self {
        GraphError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, GraphError::InvariantViolation { .. })
    }
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_entity() {
        let err = GraphError::not_found(EntityKind::Anchor, "e1-source");
        assert_eq!(err.to_string(), "anchor not found: e1-source");

        let err = GraphError::InvariantViolation {
            edge_id: "e1".to_string(),
            detail: "expected 2 anchors, found 3".to_string(),
        };
        assert!(err.is_invariant_violation());
        assert_eq!(err.to_string(), "edge e1: expected 2 anchors, found 3");

        let err = GraphError::NonFinitePosition {
            id: "a".to_string(),
            x: f32::NAN,
            y: 0.0,
        };
        assert_eq!(err.to_string(), "node a would sit at non-finite position (NaN, 0)");
    }
}
