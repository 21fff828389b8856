//! Typed component records
//!
//! A [`Component`] always carries the base fields shared by every component,
//! its decoded `specific` payload and one [`ComponentVariant`] holding the
//! variant-only fields. Fields no schema models are kept verbatim in
//! `additional_properties`, so serializing a component yields back every
//! field it was decoded from. Modeled fields are written back when they were
//! present in the source tree, even as `null` or `[]`, or when they hold a
//! value.

use crate::contract::{DataContract, Tag};
use crate::kind::{ComponentKind, UnsupportedKind};
use crate::schema::Specific;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// A decoded component
#[derive(Debug)]
pub struct Component {
    /// Component id, unique within its data product
    pub id: String,
    /// Display name
    pub name: String,
    /// Fully qualified name
    pub fully_qualified_name: Option<String>,
    /// Description
    pub description: String,
    /// Kind string as found in the descriptor (or implied by the schema)
    pub kind: String,
    /// Decoded `specific` section
    pub specific: Box<dyn Specific>,
    /// Free-form info section
    pub info: Option<Value>,
    /// Variant-only fields
    pub variant: ComponentVariant,
    /// Fields no schema models
    pub additional_properties: Map<String, Value>,
    /// Keys present in the source tree
    pub present_fields: BTreeSet<String>,
}

impl Component {
    /// Parsed kind
    ///
    /// # Errors
    /// Returns [`UnsupportedKind`] when the kind string is outside the known set
    pub fn component_kind(&self) -> Result<ComponentKind, UnsupportedKind> {
        self.kind.parse()
    }

    /// Concrete `specific` payload, if it has type `T`
    #[must_use]
    pub fn specific_as<T: 'static>(&self) -> Option<&T> {
        self.specific.downcast_ref::<T>()
    }

    /// Template id from the variant fields or the additional properties
    #[must_use]
    pub fn use_case_template_id(&self) -> Option<&str> {
        let from_variant = match &self.variant {
            ComponentVariant::StorageArea(f) => f.use_case_template_id.as_deref(),
            ComponentVariant::Workload(f) => f.use_case_template_id.as_deref(),
            ComponentVariant::OutputPort(f) => f.use_case_template_id.as_deref(),
            ComponentVariant::Custom => None,
        };
        from_variant.or_else(|| {
            self.additional_properties
                .get(crate::reader::TEMPLATE_ID_FIELD)
                .and_then(Value::as_str)
        })
    }

    /// Storage area fields, if this is a storage area
    #[must_use]
    pub fn as_storage_area(&self) -> Option<&StorageAreaFields> {
        match &self.variant {
            ComponentVariant::StorageArea(f) => Some(f),
            _ => None,
        }
    }

    /// Workload fields, if this is a workload
    #[must_use]
    pub fn as_workload(&self) -> Option<&WorkloadFields> {
        match &self.variant {
            ComponentVariant::Workload(f) => Some(f),
            _ => None,
        }
    }

    /// Output port fields, if this is an output port
    #[must_use]
    pub fn as_output_port(&self) -> Option<&OutputPortFields> {
        match &self.variant {
            ComponentVariant::OutputPort(f) => Some(f),
            _ => None,
        }
    }

    /// Serialize back into a tree
    ///
    /// # Errors
    /// Returns error if the `specific` payload can't be serialized
    pub fn to_tree(&self) -> Result<Value, serde_json::Error> {
        let mut out = Map::new();
        out.insert("id".into(), Value::String(self.id.clone()));
        out.insert("name".into(), Value::String(self.name.clone()));
        self.insert_modeled(
            &mut out,
            "fullyQualifiedName",
            self.fully_qualified_name.clone().map_or(Value::Null, Value::String),
        );
        out.insert("description".into(), Value::String(self.description.clone()));
        out.insert("kind".into(), Value::String(self.kind.clone()));
        out.insert("specific".into(), self.specific.to_tree()?);
        self.insert_modeled(&mut out, "info", self.info.clone().unwrap_or(Value::Null));

        let variant = match &self.variant {
            ComponentVariant::StorageArea(f) => serde_json::to_value(f)?,
            ComponentVariant::Workload(f) => serde_json::to_value(f)?,
            ComponentVariant::OutputPort(f) => serde_json::to_value(f)?,
            ComponentVariant::Custom => Value::Object(Map::new()),
        };
        if let Value::Object(fields) = variant {
            for (key, value) in fields {
                self.insert_modeled(&mut out, &key, value);
            }
        }
        out.extend(
            self.additional_properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        Ok(Value::Object(out))
    }

    fn insert_modeled(&self, out: &mut Map<String, Value>, key: &str, value: Value) {
        if self.present_fields.contains(key) || !is_unset(&value) {
            out.insert(key.to_string(), value);
        }
    }
}

fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_tree()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

/// Variant-only fields of a component
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentVariant {
    /// Storage area
    StorageArea(StorageAreaFields),
    /// Workload
    Workload(WorkloadFields),
    /// Output port
    OutputPort(OutputPortFields),
    /// Custom schema: non-base fields live in `additional_properties`
    Custom,
}

/// Fields specific to storage areas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageAreaFields {
    /// Owners
    pub owners: Vec<String>,
    /// Infrastructure template id
    pub infrastructure_template_id: Option<String>,
    /// Use case template id
    pub use_case_template_id: Option<String>,
    /// Ids of components this one depends on
    pub depends_on: Vec<String>,
    /// Target platform
    pub platform: Option<String>,
    /// Technology
    pub technology: Option<String>,
    /// Storage type
    pub storage_type: Option<String>,
    /// Tags
    pub tags: Vec<Value>,
}

/// Fields specific to workloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkloadFields {
    /// Version
    pub version: Option<String>,
    /// Infrastructure template id
    pub infrastructure_template_id: Option<String>,
    /// Use case template id
    pub use_case_template_id: Option<String>,
    /// Ids of components this one depends on
    pub depends_on: Vec<String>,
    /// Target platform
    pub platform: Option<String>,
    /// Technology
    pub technology: Option<String>,
    /// Workload type
    pub workload_type: Option<String>,
    /// Connection type
    pub connection_type: Option<String>,
    /// Tags
    pub tags: Vec<Value>,
    /// Ids of components read by this workload
    pub reads_from: Vec<String>,
}

/// Fields specific to output ports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputPortFields {
    /// Version
    pub version: Option<String>,
    /// Infrastructure template id
    pub infrastructure_template_id: Option<String>,
    /// Use case template id
    pub use_case_template_id: Option<String>,
    /// Ids of components this one depends on
    pub depends_on: Vec<String>,
    /// Target platform
    pub platform: Option<String>,
    /// Technology
    pub technology: Option<String>,
    /// Output port type
    pub output_port_type: Option<String>,
    /// Creation date
    pub creation_date: Option<String>,
    /// Start date
    pub start_date: Option<String>,
    /// Retention time
    pub retention_time: Option<String>,
    /// Process description
    pub process_description: Option<String>,
    /// Data contract
    pub data_contract: Option<DataContract>,
    /// Data sharing agreement
    pub data_sharing_agreement: Option<Value>,
    /// Tags
    pub tags: Vec<Tag>,
    /// Sample data
    pub sample_data: Option<Value>,
    /// Semantic linking
    pub semantic_linking: Option<Value>,
}
