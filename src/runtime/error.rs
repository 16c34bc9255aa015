//! Host call errors

use thiserror::Error;

use crate::runtime::value::ValueType;

/// Failure of a host function call.
///
/// None of these are recovered from inside a script; they travel up to
/// whoever runs it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    /// Script called a name that was never installed
    #[error("{0} is not defined")]
    UndefinedFunction(String),

    /// Too few arguments
    #[error("{name} expects {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Argument of the wrong shape
    #[error("{name}: argument {index} must be {expected}, got {found}")]
    TypeMismatch {
        name: String,
        index: usize,
        expected: ValueType,
        found: ValueType,
    },

    /// The collaborator behind a port reported a failure
    #[error("{name} failed: {message}")]
    Collaborator { name: String, message: String },

    /// No thing registered under this id
    #[error("unknown thing '{0}'")]
    UnknownThing(String),
}

impl HostError {
    /// Shorthand for [`HostError::Collaborator`].
    pub fn collaborator(
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        HostError::Collaborator {
            name: name.into(),
            message: message.into(),
        }
    }
}
