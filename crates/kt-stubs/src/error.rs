use kt_syntax::{SyntaxError, SyntaxKind};

use crate::stub::StubId;

pub type Result<T> = std::result::Result<T, StubError>;

/// Errors produced while persisting stubs or materializing the tree behind
/// them.
#[derive(Debug, thiserror::Error)]
pub enum StubError {
    /// The stub tree and the parsed tree disagree. The stub data is stale or
    /// corrupted.
    #[error("stub #{} ({kind:?}) does not match the syntax tree: {message}", id.index())]
    Mismatch {
        id: StubId,
        kind: SyntaxKind,
        message: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stub data: {0}")]
    Decode(String),

    #[error("failed to encode stub tree: {0}")]
    Encode(String),

    #[error("incompatible {what}: expected {expected}, found {found}")]
    VersionMismatch {
        what: &'static str,
        expected: u32,
        found: u32,
    },

    #[error("source text for the stubbed file is not available")]
    SourceUnavailable,

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl StubError {
    pub(crate) fn mismatch(id: StubId, kind: SyntaxKind, message: impl Into<String>) -> Self {
        let err = StubError::Mismatch {
            id,
            kind,
            message: message.into(),
        };
        tracing::error!(target = "kt.stubs", %err, "stub tree disagrees with source");
        err
    }
}

impl From<bincode::Error> for StubError {
    fn from(err: bincode::Error) -> Self {
        StubError::Decode(err.to_string())
    }
}
