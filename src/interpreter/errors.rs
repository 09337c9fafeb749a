//! Runtime error types for the interpreter
//!
//! [`RuntimeError`] covers every failure that can happen while a program runs
//! (as opposed to parse or program-model errors). All of them are fatal: the
//! run unwinds and the analysis session turns the error into a diagnostic Step.

use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Operand or condition of the wrong kind
    #[error("Type error: expected {expected}, got {got}")]
    TypeError {
        expected: String,
        got: String,
        location: SourceLocation,
    },

    #[error("Division by zero in '{operation}'")]
    DivisionByZero {
        operation: String,
        location: SourceLocation,
    },

    #[error("Index {index} out of range for array of length {length}")]
    IndexOutOfRange {
        index: i64,
        length: usize,
        location: SourceLocation,
    },

    #[error("Undefined variable '{name}'")]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Call to a name that is neither a program method nor a builtin
    #[error("Undefined method '{name}'")]
    UndefinedMethod {
        name: String,
        location: SourceLocation,
    },

    #[error("Method '{method}' expects {expected} argument(s), got {got}")]
    ArgumentCountMismatch {
        method: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    #[error("Integer overflow in '{operation}'")]
    IntegerOverflow {
        operation: String,
        location: SourceLocation,
    },

    #[error("Cannot assign to '{target}'")]
    InvalidAssignmentTarget {
        target: String,
        location: SourceLocation,
    },

    #[error("Unsupported operation: {message}")]
    UnsupportedOperation {
        message: String,
        location: SourceLocation,
    },

    #[error("No stack frame available")]
    NoStackFrame { location: SourceLocation },

    /// Step ceiling reached
    #[error("Execution limit exceeded: stopped after {limit} steps")]
    ExecutionLimitExceeded {
        limit: usize,
        location: SourceLocation,
    },

    /// Raised only under the `fail` recursion policy
    #[error("Recursion limit exceeded: '{method}' is already active {depth} times")]
    RecursionLimitExceeded {
        method: String,
        depth: usize,
        location: SourceLocation,
    },

    /// Too many frames on the call stack, across all methods
    #[error("Call depth exceeded: cannot call '{method}' with {limit} frames already active")]
    CallDepthExceeded {
        method: String,
        limit: usize,
        location: SourceLocation,
    },

    /// Array allocation budget for the run used up
    #[error("Out of memory: allocating {requested} elements would exceed the limit of {limit}")]
    OutOfMemory {
        requested: usize,
        limit: usize,
        location: SourceLocation,
    },

    #[error("Snapshot limit exceeded: {current} bytes recorded, limit is {limit}")]
    SnapshotLimitExceeded {
        current: usize,
        limit: usize,
        location: SourceLocation,
    },

    #[error("Analysis cancelled")]
    Cancelled { location: SourceLocation },
}

impl RuntimeError {
    pub fn location(&self) -> SourceLocation {
        match self {
            RuntimeError::TypeError { location, .. }
            | RuntimeError::DivisionByZero { location, .. }
            | RuntimeError::IndexOutOfRange { location, .. }
            | RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::UndefinedMethod { location, .. }
            | RuntimeError::ArgumentCountMismatch { location, .. }
            | RuntimeError::IntegerOverflow { location, .. }
            | RuntimeError::InvalidAssignmentTarget { location, .. }
            | RuntimeError::UnsupportedOperation { location, .. }
            | RuntimeError::NoStackFrame { location }
            | RuntimeError::ExecutionLimitExceeded { location, .. }
            | RuntimeError::RecursionLimitExceeded { location, .. }
            | RuntimeError::CallDepthExceeded { location, .. }
            | RuntimeError::OutOfMemory { location, .. }
            | RuntimeError::SnapshotLimitExceeded { location, .. }
            | RuntimeError::Cancelled { location } => *location,
        }
    }

    /// Shorthand for the common "expected X, got <value kind>" case
    pub fn type_error(expected: &str, got: &str, location: SourceLocation) -> Self {
        RuntimeError::TypeError {
            expected: expected.to_string(),
            got: got.to_string(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let loc = SourceLocation::new(4, 9);
        assert_eq!(
            RuntimeError::IndexOutOfRange {
                index: 10,
                length: 5,
                location: loc
            }
            .to_string(),
            "Index 10 out of range for array of length 5"
        );
        assert_eq!(
            RuntimeError::type_error("Boolean", "Integer", loc).to_string(),
            "Type error: expected Boolean, got Integer"
        );
        assert_eq!(
            RuntimeError::ExecutionLimitExceeded {
                limit: 2000,
                location: loc
            }
            .to_string(),
            "Execution limit exceeded: stopped after 2000 steps"
        );
    }

    #[test]
    fn test_location_accessor() {
        let loc = SourceLocation::new(12, 3);
        let err = RuntimeError::DivisionByZero {
            operation: "a / b".to_string(),
            location: loc,
        };
        assert_eq!(err.location(), loc);
        assert_eq!(RuntimeError::Cancelled { location: loc }.location().line, 12);
    }
}
