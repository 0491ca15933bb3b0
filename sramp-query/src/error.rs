// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Compilation errors
//!
//! Structural and unsupported-construct errors abort compilation at once.
//! Resolution and value errors are recorded and compilation continues; the
//! first recorded one is reported when the query is built.

use thiserror::Error;

use crate::classification::ResolutionError;

/// Broad error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The tree violates a node invariant
    Structural,
    /// Valid syntax that the compiler cannot translate
    UnsupportedConstruct,
    /// A classification could not be resolved
    Resolution,
    /// A literal does not parse as the type its property implies
    Value,
}

/// Errors raised while validating or compiling a query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Invalid query structure: {0}")]
    Structural(String),

    #[error("Multi-level subartifact sets are not supported")]
    MultiLevelSubartifactSet,

    #[error("Function '{0}' is not supported as a subartifact set")]
    FunctionAsSubartifactSet(String),

    #[error("Properties in namespace '{0}' are not supported")]
    ForeignPropertyNamespace(String),

    #[error("Unsupported function: {0}")]
    UnknownFunction(String),

    #[error("Function '{0}' is not available in this namespace")]
    WrongFunctionNamespace(String),

    #[error("Function '{function}' expects {expected} argument(s), found {found}")]
    ArgumentCount {
        function: String,
        expected: String,
        found: usize,
    },

    #[error("Function '{function}' expects string literal arguments")]
    ExpectedStringLiteral { function: String },

    #[error("Function '{function}' expects a property as its first argument")]
    ExpectedProperty { function: String },

    #[error("Function '{0}' cannot be compared to a value")]
    FunctionAsOperand(String),

    #[error("Property references cannot be used as values: ${0}")]
    PropertyAsValue(String),

    #[error("Function 'not' expects a sub-expression, found a literal")]
    NotRequiresExpr,

    #[error("Function '{function}' given an invalid attribute name '{key}'")]
    InvalidAttributeKey { function: String, key: String },

    #[error("Function '{0}' is only supported inside a relationship predicate")]
    AttributeOutsideRelationship(String),

    #[error("Classification resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Invalid value '{literal}' for property {property}: {reason}")]
    InvalidValue {
        literal: String,
        property: String,
        reason: String,
    },
}

impl CompileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::Structural(_) => ErrorKind::Structural,
            CompileError::Resolution(_) => ErrorKind::Resolution,
            CompileError::InvalidValue { .. } => ErrorKind::Value,
            _ => ErrorKind::UnsupportedConstruct,
        }
    }

    /// Fatal errors stop compilation immediately; the rest are deferred to [`build_query`]
    ///
    /// [`build_query`]: crate::plan::compiler::Compilation::build_query
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Structural | ErrorKind::UnsupportedConstruct
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(CompileError::Structural("x".into()).is_fatal());
        assert!(CompileError::UnknownFunction("bogus".into()).is_fatal());
        assert_eq!(
            CompileError::MultiLevelSubartifactSet.kind(),
            ErrorKind::UnsupportedConstruct
        );

        let resolution: CompileError =
            ResolutionError::UnknownClassification("Atlantis".into()).into();
        assert_eq!(resolution.kind(), ErrorKind::Resolution);
        assert!(!resolution.is_fatal());

        let value = CompileError::InvalidValue {
            literal: "yesterday".into(),
            property: "jcr:created".into(),
            reason: "bad date".into(),
        };
        assert!(!value.is_fatal());
    }

    #[test]
    fn test_messages_name_the_offender() {
        assert!(CompileError::UnknownFunction("bogus".into())
            .to_string()
            .contains("bogus"));
        assert!(CompileError::ForeignPropertyNamespace("urn:other".into())
            .to_string()
            .contains("urn:other"));
    }
}
