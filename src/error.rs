//! Error types for qir.

use thiserror::Error;

/// The main error type for qir operations.
#[derive(Debug, Error)]
pub enum QirError {
    /// An entity violated one of its construction invariants.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The translator met a node that could only exist if validation was bypassed.
    #[error("Ill-formed {entity}: {reason}")]
    IllFormedExpression {
        entity: &'static str,
        reason: String,
    },

    /// A table qualifier that no FROM/JOIN introduced.
    #[error("Unresolved alias '{alias}' in {reference}")]
    UnresolvedAlias { alias: String, reference: String },

    /// Shape description could not be expanded.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QirError {
    /// Create an ill-formed expression error.
    pub fn ill_formed(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::IllFormedExpression {
            entity,
            reason: reason.into(),
        }
    }

    /// Create an unresolved alias error.
    pub fn unresolved(alias: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::UnresolvedAlias {
            alias: alias.into(),
            reference: reference.into(),
        }
    }
}

/// Construction-time invariant violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{entity}: missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity}: '{first}' and '{second}' are mutually exclusive")]
    MutuallyExclusive {
        entity: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("{entity}: '{field}' must not be empty")]
    Empty {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity}: '{field}' out of range: {reason}")]
    OutOfRange {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("{entity}: invalid identifier '{value}'")]
    InvalidIdentifier { entity: &'static str, value: String },

    #[error("{entity}: operator {operator} {reason}")]
    OperatorMismatch {
        entity: &'static str,
        operator: String,
        reason: &'static str,
    },

    #[error("{entity}: {function} {reason}")]
    FunctionMismatch {
        entity: &'static str,
        function: String,
        reason: &'static str,
    },

    #[error("Duplicate table alias '{0}'")]
    DuplicateAlias(String),

    #[error("Unresolved alias '{alias}' in {reference}")]
    UnresolvedAlias { alias: String, reference: String },

    #[error("ORDER BY references unknown select alias '{0}'")]
    UnknownSelectAlias(String),

    /// The input could not be decoded into the IR (bad shape, unknown enum value, ...).
    #[error("Malformed IR: {0}")]
    Malformed(String),
}

impl ValidationError {
    pub fn missing(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }

    pub fn exclusive(entity: &'static str, first: &'static str, second: &'static str) -> Self {
        Self::MutuallyExclusive {
            entity,
            first,
            second,
        }
    }

    pub fn empty(entity: &'static str, field: &'static str) -> Self {
        Self::Empty { entity, field }
    }

    pub fn out_of_range(entity: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            entity,
            field,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Errors raised while expanding a shape description.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Reference to unknown definition '{0}'")]
    UnknownDefinition(String),

    #[error("Self-referential definition: {}", .path.join(" -> "))]
    SelfReference { path: Vec<String> },

    #[error("Unsupported reference '{0}': only local '#/$defs/' and '#/definitions/' pointers are resolved")]
    UnsupportedReference(String),
}

/// Result type alias for qir operations.
pub type QirResult<T> = Result<T, QirError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::exclusive("FromClause", "table", "derived");
        assert_eq!(
            err.to_string(),
            "FromClause: 'table' and 'derived' are mutually exclusive"
        );
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: QirError = ValidationError::missing("AggregateExpr", "input").into();
        assert_eq!(err.to_string(), "AggregateExpr: missing required field 'input'");
    }

    #[test]
    fn test_self_reference_path() {
        let err = SchemaError::SelfReference {
            path: vec!["Node".into(), "Child".into(), "Node".into()],
        };
        assert_eq!(err.to_string(), "Self-referential definition: Node -> Child -> Node");
    }
}
