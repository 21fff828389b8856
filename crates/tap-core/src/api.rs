//! Input payloads accepted by the operation flows

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tap_model::DescriptorKind;

/// Input of validate, provision and unprovision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequest {
    /// Granularity of the descriptor, as received
    pub descriptor_kind: String,
    /// Raw descriptor text
    pub descriptor: String,
    /// Whether unprovisioning should also remove data
    #[serde(default)]
    pub remove_data: bool,
    /// Last descriptor enriched by the platform, as a tree or as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_enriched_descriptor: Option<Value>,
}

impl ProvisioningRequest {
    /// Request for a component descriptor
    #[must_use]
    pub fn component(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor_kind: DescriptorKind::ComponentDescriptor.into(),
            descriptor: descriptor.into(),
            remove_data: false,
            latest_enriched_descriptor: None,
        }
    }

    /// Override the descriptor kind
    #[must_use]
    pub fn with_descriptor_kind(mut self, kind: impl Into<String>) -> Self {
        self.descriptor_kind = kind.into();
        self
    }

    /// Set the remove data flag
    #[must_use]
    pub fn with_remove_data(mut self, remove_data: bool) -> Self {
        self.remove_data = remove_data;
        self
    }

    /// Attach the last enriched descriptor
    #[must_use]
    pub fn with_latest_enriched_descriptor(mut self, descriptor: Value) -> Self {
        self.latest_enriched_descriptor = Some(descriptor);
        self
    }
}

/// Input of an access control update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAclRequest {
    /// Identities to grant access to
    pub refs: Vec<String>,
    /// Provisioning request and result this update refers to
    pub provision_info: ProvisionInfoRequest,
}

impl UpdateAclRequest {
    /// Update for the component described by `descriptor`
    #[must_use]
    pub fn new(refs: Vec<String>, descriptor: impl Into<String>) -> Self {
        Self {
            refs,
            provision_info: ProvisionInfoRequest {
                request: descriptor.into(),
                result: String::new(),
            },
        }
    }
}

/// Prior provisioning request and its result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvisionInfoRequest {
    /// Descriptor text of the prior provisioning request
    pub request: String,
    /// Result of the prior provisioning
    #[serde(default)]
    pub result: String,
}

/// Input of reverse provisioning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseProvisioningRequest {
    /// Template id of the component to import
    pub use_case_template_id: String,
    /// Target environment
    pub environment: String,
    /// Free-form params, as a tree or as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Catalog info of the component, as a tree or as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_info: Option<Value>,
}

impl ReverseProvisioningRequest {
    /// Request without params or catalog info
    #[must_use]
    pub fn new(use_case_template_id: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            use_case_template_id: use_case_template_id.into(),
            environment: environment.into(),
            params: None,
            catalog_info: None,
        }
    }

    /// Attach params
    #[must_use]
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Attach catalog info
    #[must_use]
    pub fn with_catalog_info(mut self, catalog_info: Value) -> Self {
        self.catalog_info = Some(catalog_info);
        self
    }
}
