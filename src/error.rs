//! Error types for the family chart core.
//!
//! Soft failures (cross-tree queries, no kinship path, cyclic data) are not
//! errors; they resolve to sentinel values. Errors here are caller mistakes.

/// Errors surfaced by the chart API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    /// A person id was not present in the loaded snapshot.
    #[error("unknown person: {0}")]
    UnknownPerson(String),

    /// An operation needs a computed layout but none exists yet.
    #[error("no layout computed; call computeLayout first")]
    NoLayout,

    /// The snapshot passed from JavaScript could not be decoded.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result alias for chart operations.
pub type Result<T> = std::result::Result<T, ChartError>;
