//! Error types for DOM access and configuration.

use thiserror::Error;

/// Errors raised while reading or writing the DOM.
///
/// Position mapping itself never errors: a point or range that cannot be
/// mapped is `None`. These errors come from the DOM layer underneath.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DomError {
    /// Firefox refuses property access on internal "restricted" elements
    /// (e.g. the stepper arrows of a number input).
    #[error("permission denied to access property {0:?}")]
    RestrictedAccess(String),

    /// The node is no longer attached to a document.
    #[error("node is detached from the document")]
    Detached,

    /// A DOM call threw.
    #[error("DOM operation failed: {0}")]
    Operation(String),
}

impl DomError {
    pub fn is_restricted_access(&self) -> bool {
        matches!(self, DomError::RestrictedAccess(_))
    }
}

/// Errors loading a [`SyncConfig`](crate::SyncConfig).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid sync config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("selection throttle must be non-zero")]
    ZeroThrottle,
}
