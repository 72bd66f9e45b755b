use crate::{SyntaxKind, TextRange};

/// Misuse of the tree API or a broken parser invariant.
///
/// Structural absence (a child the source simply does not contain) is never
/// reported through this type; accessors return `None` for that.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// The node is not attached to a file root.
    #[error("{kind:?} at {}..{} is not attached to a file", range.start, range.end)]
    InvalidTreeState { kind: SyntaxKind, range: TextRange },

    /// The operation has no meaning for this node kind (e.g. renaming a node
    /// without a name slot).
    #[error("`{operation}` is not supported for {kind:?}")]
    Unsupported {
        operation: &'static str,
        kind: SyntaxKind,
    },

    /// A name that cannot be written as a Kotlin identifier, even with
    /// backticks.
    #[error("`{name}` cannot be used as an identifier")]
    InvalidName { name: String },

    /// A child that the grammar guarantees is missing. Indicates a parser
    /// bug rather than bad input.
    #[error("{kind:?} at {}..{} has no {expected:?} child", range.start, range.end)]
    MissingElement {
        kind: SyntaxKind,
        expected: SyntaxKind,
        range: TextRange,
    },
}

impl SyntaxError {
    pub(crate) fn invalid_tree_state(node: &crate::SyntaxNode) -> Self {
        SyntaxError::InvalidTreeState {
            kind: node.kind(),
            range: node.text_range().into(),
        }
    }

    pub(crate) fn missing(node: &crate::SyntaxNode, expected: SyntaxKind) -> Self {
        let err = SyntaxError::MissingElement {
            kind: node.kind(),
            expected,
            range: node.text_range().into(),
        };
        tracing::error!(%err, "parser invariant violated");
        err
    }
}
