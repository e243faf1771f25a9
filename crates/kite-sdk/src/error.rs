//! Error types for the Kite SDK

use crate::reference::RefKind;
use kite_core::EngineError;

/// Result type for reference operations
pub type RefResult<T> = Result<T, ReferenceError>;

/// Reference lifetime errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReferenceError {
    /// The reference's strong count is already at zero
    #[error("reference for '{0}' discipline already released")]
    AlreadyReleased(RefKind),

    /// No reference was ever registered for the discipline
    #[error("no reference registered for '{0}' discipline")]
    NotRegistered(RefKind),

    /// Underlying engine failure
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Value conversion errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConvertError {
    /// Type mismatch during conversion
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Underlying engine failure
    #[error(transparent)]
    Engine(#[from] EngineError),
}
