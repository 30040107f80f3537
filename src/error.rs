//! Error types for sources and cursors.
//!
//! Every variant is a contract violation by the caller. Nothing here is
//! transient, so nothing is retried.

use thiserror::Error;

/// Errors raised by tabular sources, cursors and getters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CursorError {
    /// A required collaborator was not supplied.
    #[error("{component}: value cannot be null (parameter '{param}')")]
    InvalidArgument {
        component: String,
        param: &'static str,
    },

    /// A checked precondition did not hold, e.g. a getter was requested for
    /// an inactive column.
    #[error("{component}: {message}")]
    Precondition { component: String, message: String },

    /// A getter was invoked while the cursor had no current row.
    #[error("{component}: fetch attempted while cursor has no current row")]
    RowState { component: String },

    /// A getter was requested with a value type the column cannot produce.
    #[error("{component}: column {column} has type {actual}, requested {requested}")]
    TypeMismatch {
        component: String,
        column: usize,
        requested: &'static str,
        actual: String,
    },
}

impl CursorError {
    /// Name of the host scope that raised the error.
    pub fn component(&self) -> &str {
        match self {
            CursorError::InvalidArgument { component, .. }
            | CursorError::Precondition { component, .. }
            | CursorError::RowState { component }
            | CursorError::TypeMismatch { component, .. } => component,
        }
    }

    pub fn is_row_state(&self) -> bool {
        matches!(self, CursorError::RowState { .. })
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, CursorError::Precondition { .. })
    }
}

/// Result type for source and cursor operations.
pub type Result<T> = std::result::Result<T, CursorError>;
