//! Diagnostic scope passed explicitly to every source and cursor.
//!
//! A `Host` names the component that is doing the work. Sources register a
//! child scope for themselves on construction, and all argument checks go
//! through it so that failures carry the component that rejected them.

use std::sync::Arc;

use tracing::{debug, Span};

use crate::error::CursorError;

/// Named validation and diagnostics scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    name: Arc<str>,
}

impl Host {
    /// Create a root scope.
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }

    /// Create a child scope `parent/name`.
    pub fn register(&self, name: &str) -> Host {
        let child = Host {
            name: format!("{}/{}", self.name, name).into(),
        };
        debug!(component = %child.name, "registered host scope");
        child
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Require that a collaborator is present.
    pub fn check_value<T>(&self, value: Option<T>, param: &'static str) -> Result<T, CursorError> {
        value.ok_or_else(|| CursorError::InvalidArgument {
            component: self.name.to_string(),
            param,
        })
    }

    /// Require that `condition` holds, failing with a precondition error.
    pub fn check(&self, condition: bool, message: impl FnOnce() -> String) -> Result<(), CursorError> {
        if condition {
            Ok(())
        } else {
            Err(self.precondition(message()))
        }
    }

    pub fn precondition(&self, message: impl Into<String>) -> CursorError {
        CursorError::Precondition {
            component: self.name.to_string(),
            message: message.into(),
        }
    }

    pub fn row_state_error(&self) -> CursorError {
        CursorError::RowState {
            component: self.name.to_string(),
        }
    }

    /// Span tagging events with this scope's name.
    pub fn span(&self) -> Span {
        tracing::debug_span!("host", component = %self.name)
    }
}
