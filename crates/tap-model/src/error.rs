//! Low-level decoding errors
//!
//! These never leave the pipeline on their own: every step wraps them as the
//! `cause` of a [`Problem`](crate::Problem) inside a
//! [`FailedOperation`](crate::FailedOperation).

use crate::problem::ConstraintViolation;
use serde_json::Value;

/// Errors raised while turning text or trees into typed values
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Input text is not valid YAML (JSON is accepted as a YAML subset)
    #[error("{0}")]
    Syntax(#[from] serde_yaml::Error),

    /// Tree shape doesn't match the target type
    #[error("{0}")]
    Shape(#[from] serde_json::Error),

    /// Node has an unexpected type
    #[error("expected {expected} but found {found}")]
    UnexpectedNode {
        /// Expected node type
        expected: &'static str,
        /// Actual node type
        found: &'static str,
    },

    /// Text contained no document at all
    #[error("empty document")]
    EmptyDocument,
}

impl DecodeError {
    /// Create unexpected node error for `node`
    #[must_use]
    pub fn unexpected(expected: &'static str, node: &Value) -> Self {
        Self::UnexpectedNode {
            expected,
            found: node_type(node),
        }
    }
}

/// Errors raised by a [`SpecificSchema`](crate::SpecificSchema) decoder
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Payload couldn't be decoded into the schema type
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Payload decoded but violates the schema constraints
    #[error("{} constraint violation(s)", .0.len())]
    Violations(Vec<ConstraintViolation>),
}

/// Human readable name of a tree node type
#[must_use]
pub(crate) fn node_type(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unexpected_node_display() {
        let err = DecodeError::unexpected("object", &json!([1, 2]));
        assert_eq!(err.to_string(), "expected object but found array");
    }

    #[test]
    fn violations_display() {
        let err = SchemaError::Violations(vec![
            ConstraintViolation::new("a", "must not be null"),
            ConstraintViolation::new("b", "must not be null"),
        ]);
        assert_eq!(err.to_string(), "2 constraint violation(s)");
    }

    #[test]
    fn node_type_names() {
        assert_eq!(node_type(&Value::Null), "null");
        assert_eq!(node_type(&json!("x")), "string");
        assert_eq!(node_type(&json!({})), "object");
    }
}
