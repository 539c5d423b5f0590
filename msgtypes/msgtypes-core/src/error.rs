//! The single error type shared by every crate in this workspace.

use thiserror::Error;

/// Errors raised anywhere in the parse → normalize → store → hash pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesysError {
    /// The grammar did not consume the whole input, or a terminal failed.
    #[error("could not parse: {snippet:?}")]
    Parse { snippet: String },

    /// Hash generation was requested for a type not present in the store.
    #[error("type {name:?} is unknown")]
    UnknownType { name: String },

    /// A field descriptor is malformed in a way that should have been
    /// impossible after normalization (e.g. a cycle observed through the
    /// hash memoization sentinel). Never expected in production; reported
    /// as a distinct kind to aid testing.
    #[error("invariant violation: {message}")]
    InvariantViolation { message: String },
}
