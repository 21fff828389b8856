//! Descriptor reader
//!
//! Parses descriptor text (YAML, with JSON accepted as a subset) into a
//! [`Descriptor`] and locates the raw component a request targets. Nothing
//! here is typed per component: that is the decoder's job.

use crate::data_product::{DataProduct, Descriptor};
use crate::error::DecodeError;
use crate::problem::{FailedOperation, OperationResult, Problem};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Field carrying a component's template id
pub const TEMPLATE_ID_FIELD: &str = "useCaseTemplateId";

/// User message for descriptor text that can't be parsed
pub const DESCRIPTOR_PARSE_MESSAGE: &str =
    "Failed to deserialize the input YAML descriptor. Check the error details for more information.";

const TREE_PARSE_MESSAGE: &str =
    "Failed to parse the received text. Check the error details for more information.";

/// Parse descriptor text
///
/// # Errors
/// Returns a failure whose single problem carries the parser error as cause;
/// the raw text never appears in the user message
pub fn parse_descriptor(text: &str) -> OperationResult<Descriptor> {
    let descriptor: Descriptor = decode_text(text).map_err(|cause| {
        tracing::warn!(error = %cause, "descriptor text is not a valid descriptor");
        FailedOperation::single(
            DESCRIPTOR_PARSE_MESSAGE,
            Problem::with_cause("Failed to deserialize the YAML descriptor", cause),
        )
    })?;
    tracing::debug!(
        data_product = descriptor.data_product.id.as_deref().unwrap_or_default(),
        component = %descriptor.component_id_to_provision,
        "parsed descriptor"
    );
    Ok(descriptor)
}

/// Parse YAML or JSON text into a tree
///
/// # Errors
/// Returns a failure carrying the parser error as cause
pub fn parse_tree(text: &str) -> OperationResult<Value> {
    decode_text(text).map_err(|cause| {
        FailedOperation::single(
            TREE_PARSE_MESSAGE,
            Problem::with_cause("Failed to parse the received text into a tree", cause),
        )
    })
}

/// Normalize a value that may arrive either as text or as a tree
///
/// # Errors
/// Returns a failure when a text value can't be parsed
pub fn to_tree(value: Value) -> OperationResult<Value> {
    match value {
        Value::String(text) => parse_tree(&text),
        tree => Ok(tree),
    }
}

/// Raw component of `data_product` whose `id` equals `component_id`
#[must_use]
pub fn component_to_provision<'a>(data_product: &'a DataProduct, component_id: &str) -> Option<&'a Value> {
    data_product
        .components
        .iter()
        .find(|c| c.get("id").and_then(Value::as_str) == Some(component_id))
}

/// Kind string of a raw component, if present and non-empty
#[must_use]
pub fn component_kind(component: &Value) -> Option<&str> {
    non_blank_field(component, "kind")
}

/// Template id of a raw component, if present and non-empty
#[must_use]
pub fn template_id(component: &Value) -> Option<&str> {
    non_blank_field(component, TEMPLATE_ID_FIELD)
}

pub(crate) fn decode_text<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    if text.trim().is_empty() {
        return Err(DecodeError::EmptyDocument);
    }
    Ok(serde_yaml::from_str(text)?)
}

fn non_blank_field<'a>(node: &'a Value, field: &str) -> Option<&'a str> {
    node.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const DESCRIPTOR: &str = r"
dataProduct:
  id: urn:dmb:dp:finance:sales:0
  name: sales
  components:
    - id: urn:dmb:cmp:finance:sales:0:raw
      kind: storage
      useCaseTemplateId: urn:dmb:utm:s3-storage-template:0.0.0
    - id: urn:dmb:cmp:finance:sales:0:job
      kind: workload
      useCaseTemplateId: ''
componentIdToProvision: urn:dmb:cmp:finance:sales:0:raw
";

    #[test]
    fn parses_yaml_descriptor() {
        let descriptor = parse_descriptor(DESCRIPTOR).unwrap();
        assert_eq!(descriptor.data_product.name.as_deref(), Some("sales"));
        let component =
            component_to_provision(&descriptor.data_product, &descriptor.component_id_to_provision).unwrap();
        assert_eq!(component_kind(component), Some("storage"));
        assert_eq!(
            template_id(component),
            Some("urn:dmb:utm:s3-storage-template:0.0.0")
        );
    }

    #[test]
    fn parses_json_descriptor() {
        let text = r#"{"dataProduct": {"components": []}, "componentIdToProvision": "x"}"#;
        let descriptor = parse_descriptor(text).unwrap();
        assert_eq!(descriptor.component_id_to_provision, "x");
        assert!(component_to_provision(&descriptor.data_product, "x").is_none());
    }

    #[test]
    fn blank_template_id_reads_as_missing() {
        let descriptor = parse_descriptor(DESCRIPTOR).unwrap();
        let job = descriptor
            .data_product
            .component_to_provision("urn:dmb:cmp:finance:sales:0:job")
            .unwrap();
        assert_eq!(template_id(job), None);
    }

    #[test]
    fn rejects_non_descriptor_text() {
        let failed = parse_descriptor("an_invalid_descriptor").unwrap_err();
        assert_eq!(failed.message(), DESCRIPTOR_PARSE_MESSAGE);
        assert_eq!(failed.problems().len(), 1);
        assert!(failed.problems()[0].cause().is_some());
        assert!(!failed.message().contains("an_invalid_descriptor"));
    }

    #[test]
    fn rejects_empty_text() {
        let failed = parse_descriptor("  \n").unwrap_err();
        assert_eq!(
            failed.problems()[0].message(),
            "Failed to deserialize the YAML descriptor: empty document"
        );
    }

    #[test]
    fn to_tree_parses_text_and_keeps_trees() {
        assert_eq!(to_tree(json!("a: 1")).unwrap(), json!({"a": 1}));
        assert_eq!(to_tree(json!({"a": 1})).unwrap(), json!({"a": 1}));
        assert!(to_tree(json!("a: [")).is_err());
    }
}
