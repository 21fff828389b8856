//! Output port data contract records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Data contract attached to an output port
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataContract {
    /// Column schema
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schema: Vec<Column>,
    /// Terms and conditions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_and_conditions: Option<String>,
    /// Service level agreement
    #[serde(rename = "SLA", skip_serializing_if = "Option::is_none")]
    pub sla: Option<Sla>,
    /// Access endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Bi-temporal business timestamp column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bi_temp_business_ts: Option<String>,
    /// Bi-temporal write timestamp column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bi_temp_write_ts: Option<String>,
    /// Unmodelled fields
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

/// Service level agreement of a data contract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sla {
    /// Expected refresh interval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_of_change: Option<String>,
    /// Expected data freshness
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeliness: Option<String>,
    /// Availability target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_time: Option<String>,
    /// Unmodelled fields
    #[serde(flatten)]
    pub additional_properties: Map<String, Value>,
}

/// Column of a data contract schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Column {
    /// Column name
    pub name: Option<String>,
    /// Column description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column data type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Element type for array columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_data_type: Option<String>,
    /// Maximum length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_length: Option<u32>,
    /// Column constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    /// Numeric precision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    /// Numeric scale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Column tags
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// Classification tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tag {
    /// Fully qualified tag name
    #[serde(rename = "tagFQN")]
    pub tag_fqn: String,
    /// Tag source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Label type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_type: Option<String>,
    /// Tag state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Tag {
    /// Tag with just a name
    #[inline]
    #[must_use]
    pub fn new(tag_fqn: impl Into<String>) -> Self {
        Self {
            tag_fqn: tag_fqn.into(),
            ..Self::default()
        }
    }
}
