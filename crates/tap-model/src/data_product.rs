//! Data product and descriptor records

use crate::reader;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level descriptor: a data product plus the component to operate on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// The data product
    pub data_product: DataProduct,
    /// Id of the component the request targets
    #[serde(default)]
    pub component_id_to_provision: String,
}

/// A data product with its components kept as raw trees
///
/// Components stay untyped here; the decoder picks a schema per component
/// from its template id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataProduct {
    /// Data product id
    pub id: Option<String>,
    /// Name
    pub name: Option<String>,
    /// Fully qualified name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_name: Option<String>,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kind, normally `dataproduct`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Owner identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_product_owner: Option<String>,
    /// Owner display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_product_owner_display_name: Option<String>,
    /// Contact email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Development group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_group: Option<String>,
    /// Owner group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_group: Option<String>,
    /// Information SLA
    #[serde(rename = "informationSLA", skip_serializing_if = "Option::is_none")]
    pub information_sla: Option<String>,
    /// Status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Maturity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity: Option<String>,
    /// Billing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing: Option<Value>,
    /// Tags
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Value>,
    /// Data product level specific section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific: Option<Value>,
    /// Raw component trees
    pub components: Vec<Value>,
    /// Fields no schema models
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

impl DataProduct {
    /// Raw component whose `id` equals `component_id`
    #[must_use]
    pub fn component_to_provision(&self, component_id: &str) -> Option<&Value> {
        reader::component_to_provision(self, component_id)
    }

    /// Kind of the component with `component_id`
    #[must_use]
    pub fn component_kind_to_provision(&self, component_id: &str) -> Option<&str> {
        self.component_to_provision(component_id)
            .and_then(reader::component_kind)
    }

    /// Template id of the component with `component_id`
    #[must_use]
    pub fn component_template_id_to_provision(&self, component_id: &str) -> Option<&str> {
        self.component_to_provision(component_id)
            .and_then(reader::template_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data_product() -> DataProduct {
        serde_json::from_value(json!({
            "id": "urn:dmb:dp:finance:sales:0",
            "name": "sales",
            "informationSLA": "2BD",
            "lifecycle": "beta",
            "components": [
                {"id": "c1", "kind": "storage", "useCaseTemplateId": "urn:tpl:s3"},
                {"id": "c2", "kind": "workload"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn finds_component_fields() {
        let dp = data_product();
        assert_eq!(dp.component_kind_to_provision("c1"), Some("storage"));
        assert_eq!(dp.component_template_id_to_provision("c1"), Some("urn:tpl:s3"));
        assert_eq!(dp.component_template_id_to_provision("c2"), None);
        assert!(dp.component_to_provision("c3").is_none());
    }

    #[test]
    fn keeps_renamed_and_unknown_fields() {
        let dp = data_product();
        assert_eq!(dp.information_sla.as_deref(), Some("2BD"));
        assert_eq!(dp.additional_properties["lifecycle"], json!("beta"));
        let back = serde_json::to_value(&dp).unwrap();
        assert_eq!(back["informationSLA"], json!("2BD"));
        assert_eq!(back["lifecycle"], json!("beta"));
    }
}
