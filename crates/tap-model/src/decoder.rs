//! Typed decoding of raw trees
//!
//! - [`decode_component`]: raw component tree into a [`Component`] for a
//!   given [`ComponentSchema`] and [`SpecificSchema`]
//! - [`decode_with_schema`]: raw tree into a boxed [`Specific`]
//! - [`decode_object`] / [`decode_str`]: raw tree or text into any serde type
//!
//! Required-field checks aggregate: every missing field is reported in one
//! failure rather than stopping at the first.

use crate::component::{Component, ComponentVariant};
use crate::error::{node_type, DecodeError, SchemaError};
use crate::problem::{ConstraintViolation, FailedOperation, OperationResult, Problem};
use crate::reader;
use crate::schema::{ComponentSchema, Specific, SpecificSchema};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// User message for component trees that can't be decoded
pub const COMPONENT_DECODE_MESSAGE: &str =
    "Failed to deserialize the component. Check the error details for more information.";

/// User message for objects that can't be decoded
pub const OBJECT_DECODE_MESSAGE: &str =
    "Failed to deserialize the object. Check the error details for more information.";

/// User message for decoded values that break their constraints
pub const CONSTRAINTS_MESSAGE: &str =
    "The received input doesn't satisfy the constraints required by its schema. Check the error details for more information.";

const BASE_REQUIRED_FIELDS: [&str; 4] = ["id", "name", "description", "specific"];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComponent {
    id: String,
    name: String,
    #[serde(default)]
    fully_qualified_name: Option<String>,
    description: String,
    #[serde(default)]
    kind: Option<String>,
    specific: Value,
    #[serde(default)]
    info: Option<Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Deserialize)]
struct WithExtras<F> {
    #[serde(flatten)]
    fields: F,
    #[serde(flatten)]
    extras: Map<String, Value>,
}

/// Decode a raw component tree
///
/// When the tree omits `kind` and the schema implies one, the implied kind
/// is used.
///
/// # Errors
/// Returns a failure when the node isn't an object, when required fields are
/// missing (one problem per field) or when `specific` doesn't fit its schema
pub fn decode_component(
    node: &Value,
    schema: &ComponentSchema,
    specific_schema: &SpecificSchema,
) -> OperationResult<Component> {
    let Some(fields) = node.as_object() else {
        return Err(component_failure(DecodeError::unexpected("object", node)));
    };

    let violations = missing_required_fields(fields, schema);
    if !violations.is_empty() {
        tracing::debug!(count = violations.len(), "component misses required fields");
        return Err(FailedOperation::from_violations(CONSTRAINTS_MESSAGE, &violations)
            .with_input(render(node)));
    }

    let raw: RawComponent = serde_json::from_value(node.clone())
        .map_err(|e| component_failure(DecodeError::from(e)))?;

    let specific = specific_schema
        .decode(raw.specific)
        .map_err(|e| specific_failure(&raw.id, specific_schema, e, node))?;

    let present_fields = fields.keys().cloned().collect();
    let (variant, additional_properties) = decode_variant(schema, raw.rest)?;

    let kind = match raw.kind {
        Some(kind) if !kind.trim().is_empty() => kind,
        _ => schema
            .implied_kind()
            .map(|k| k.as_str().to_string())
            .unwrap_or_default(),
    };

    tracing::debug!(
        component = %raw.id,
        schema = %schema,
        specific = specific_schema.name(),
        "decoded component"
    );

    Ok(Component {
        id: raw.id,
        name: raw.name,
        fully_qualified_name: raw.fully_qualified_name,
        description: raw.description,
        kind,
        specific,
        info: raw.info,
        variant,
        additional_properties,
        present_fields,
    })
}

/// Decode a raw tree with a runtime-chosen schema
///
/// # Errors
/// Returns a failure when the tree doesn't fit the schema or breaks its
/// constraints
pub fn decode_with_schema(node: &Value, schema: &SpecificSchema) -> OperationResult<Box<dyn Specific>> {
    schema.decode(node.clone()).map_err(|e| match e {
        SchemaError::Decode(cause) => object_failure(cause),
        SchemaError::Violations(violations) => {
            FailedOperation::from_violations(CONSTRAINTS_MESSAGE, &violations).with_input(render(node))
        }
    })
}

/// Decode a raw tree into `T`
///
/// # Errors
/// Returns a failure carrying the decoding error as cause
pub fn decode_object<T: DeserializeOwned>(node: &Value) -> OperationResult<T> {
    T::deserialize(node).map_err(|e| object_failure(DecodeError::from(e)))
}

/// Decode YAML or JSON text into `T`
///
/// # Errors
/// Returns a failure carrying the parser error as cause
pub fn decode_str<T: DeserializeOwned>(text: &str) -> OperationResult<T> {
    reader::decode_text(text).map_err(object_failure)
}

fn missing_required_fields(
    fields: &Map<String, Value>,
    schema: &ComponentSchema,
) -> Vec<ConstraintViolation> {
    let kind_required = schema.implied_kind().is_none();
    BASE_REQUIRED_FIELDS
        .iter()
        .copied()
        .chain(kind_required.then_some("kind"))
        .filter(|field| fields.get(*field).map_or(true, Value::is_null))
        .map(ConstraintViolation::missing)
        .collect()
}

fn decode_variant(
    schema: &ComponentSchema,
    rest: Map<String, Value>,
) -> OperationResult<(ComponentVariant, Map<String, Value>)> {
    fn split<F: DeserializeOwned>(rest: Map<String, Value>) -> OperationResult<(F, Map<String, Value>)> {
        let decoded: WithExtras<F> = serde_json::from_value(Value::Object(rest))
            .map_err(|e| component_failure(DecodeError::from(e)))?;
        Ok((decoded.fields, decoded.extras))
    }

    Ok(match schema {
        ComponentSchema::StorageArea => {
            let (fields, extras) = split(rest)?;
            (ComponentVariant::StorageArea(fields), extras)
        }
        ComponentSchema::Workload => {
            let (fields, extras) = split(rest)?;
            (ComponentVariant::Workload(fields), extras)
        }
        ComponentSchema::OutputPort => {
            let (fields, extras) = split(rest)?;
            (ComponentVariant::OutputPort(fields), extras)
        }
        ComponentSchema::Custom(_) => (ComponentVariant::Custom, rest),
    })
}

fn specific_failure(
    component_id: &str,
    schema: &SpecificSchema,
    error: SchemaError,
    node: &Value,
) -> FailedOperation {
    match error {
        SchemaError::Decode(cause) => FailedOperation::single(
            COMPONENT_DECODE_MESSAGE,
            Problem::with_cause(
                format!(
                    "Failed to deserialize the 'specific' field of component '{component_id}' as {}",
                    schema.name()
                ),
                cause,
            ),
        ),
        SchemaError::Violations(violations) => {
            let violations: Vec<_> = violations
                .into_iter()
                .map(|v| v.nested_under("specific"))
                .collect();
            FailedOperation::from_violations(CONSTRAINTS_MESSAGE, &violations).with_input(render(node))
        }
    }
}

fn component_failure(cause: DecodeError) -> FailedOperation {
    FailedOperation::single(
        COMPONENT_DECODE_MESSAGE,
        Problem::with_cause("Failed to deserialize the component", cause),
    )
}

fn object_failure(cause: DecodeError) -> FailedOperation {
    FailedOperation::single(
        OBJECT_DECODE_MESSAGE,
        Problem::with_cause("Failed to deserialize the object", cause),
    )
}

fn render(node: &Value) -> String {
    serde_json::to_string(node).unwrap_or_else(|_| format!("<{}>", node_type(node)))
}
