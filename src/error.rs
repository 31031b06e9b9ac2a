//! Error types for chain operations

use crate::store::StoreError;

/// Errors that can occur while indexing, scoring, or generating.
///
/// "No trained data" conditions are not represented here: an empty model
/// is a valid steady state, so seed selection and generation resolve it
/// to empty results instead of errors.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// An empty token sequence was passed where at least one token is required.
    #[error("empty token sequence")]
    EmptyTokens,

    #[error("invalid chain configuration: {0}")]
    Config(String),

    /// A store failure, propagated unmodified. The engine never retries.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ChainError>;
