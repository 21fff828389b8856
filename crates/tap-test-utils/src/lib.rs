//! Testing utilities for TAP workspace
//!
//! Shared descriptor fixtures, sample payload types and recording doubles
//! for validators and provisioners.

#![allow(missing_docs)]

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tap_core::{
    ComponentClassRegistry, ComponentValidator, ProvisionConfiguration, ProvisioningRequest,
    Provisioner, SpecificClassRegistry, TechAdapterService, ValidationConfiguration,
};
use tap_model::{
    reader, AccessControlOperationRequest, ComponentKind, ConstraintViolation,
    Constraints, FailedOperation, Log, OperationResult, OperationType, Problem,
    ProvisionInfo, ProvisionOperationRequest, ReverseProvisionInfo,
    ReverseProvisionOperationRequest, SpecificSchema, ValidationRequest,
};

pub const STORAGE_DESCRIPTOR: &str = include_str!("../fixtures/storage_descriptor.yml");
pub const WORKLOAD_DESCRIPTOR: &str = include_str!("../fixtures/workload_descriptor.yml");
pub const OUTPUT_PORT_DESCRIPTOR: &str = include_str!("../fixtures/output_port_descriptor.yml");
pub const CATALOG_INFO: &str = include_str!("../fixtures/catalog_info.yml");

pub const STORAGE_TEMPLATE: &str = "urn:dmb:utm:s3-storage-template:0.0.0";
pub const WORKLOAD_TEMPLATE: &str = "urn:dmb:utm:airflow-workload-template:0.0.0";
pub const OUTPUT_PORT_TEMPLATE: &str = "urn:dmb:utm:snowflake-view-template:0.0.0";

pub const STORAGE_COMPONENT_ID: &str = "urn:dmb:cmp:finance:sales:0:raw-files";
pub const WORKLOAD_COMPONENT_ID: &str = "urn:dmb:cmp:finance:sales:0:ingestion";
pub const OUTPUT_PORT_COMPONENT_ID: &str = "urn:dmb:cmp:finance:sales:0:daily-view";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Specific {
    pub bucket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
}

impl Constraints for S3Specific {
    fn violations(&self) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        if self.bucket.trim().is_empty() {
            violations.push(ConstraintViolation::new("bucket", "must not be blank"));
        }
        if self.retention_days == Some(0) {
            violations.push(ConstraintViolation::new("retentionDays", "must be greater than 0"));
        }
        violations
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirflowSpecific {
    pub dag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeViewSpecific {
    pub database: String,
    pub schema: String,
    pub view_name: String,
}

/// Params accepted when importing an existing bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3ImportParams {
    pub bucket: String,
    #[serde(default)]
    pub prefix: Option<String>,
}

pub fn component_registry() -> ComponentClassRegistry {
    ComponentClassRegistry::default_components(
        Some(STORAGE_TEMPLATE),
        Some(WORKLOAD_TEMPLATE),
        Some(OUTPUT_PORT_TEMPLATE),
    )
}

pub fn specific_registry() -> SpecificClassRegistry {
    SpecificClassRegistry::new()
        .with_specific(STORAGE_TEMPLATE, SpecificSchema::validated::<S3Specific>())
        .with_specific(WORKLOAD_TEMPLATE, SpecificSchema::of::<AirflowSpecific>())
        .with_specific(OUTPUT_PORT_TEMPLATE, SpecificSchema::of::<SnowflakeViewSpecific>())
        .with_reverse_provision_params(STORAGE_TEMPLATE, SpecificSchema::of::<S3ImportParams>())
}

/// Service wired with the sample registries and the given handlers
pub fn service(validation: ValidationConfiguration, provision: ProvisionConfiguration) -> TechAdapterService {
    TechAdapterService::builder()
        .with_component_classes(component_registry())
        .with_specific_classes(specific_registry())
        .with_validation(validation)
        .with_provision(provision)
        .build()
}

pub fn provisioning_request(descriptor: &str) -> ProvisioningRequest {
    ProvisioningRequest::component(descriptor)
}

pub fn catalog_info() -> Value {
    reader::parse_tree(CATALOG_INFO).unwrap()
}

/// Descriptor text with `componentIdToProvision` replaced
pub fn with_component_to_provision(descriptor: &str, component_id: &str) -> String {
    descriptor
        .lines()
        .map(|line| {
            if line.starts_with("componentIdToProvision:") {
                format!("componentIdToProvision: {component_id}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validator recording every call, accepting or rejecting all of them
#[derive(Debug, Default)]
pub struct RecordingValidator {
    calls: Mutex<Vec<(OperationType, String)>>,
    rejection: Option<String>,
}

impl RecordingValidator {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rejecting(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            rejection: Some(message.to_string()),
        })
    }

    /// Operation and component id of each call
    pub fn calls(&self) -> Vec<(OperationType, String)> {
        self.calls.lock().clone()
    }
}

impl ComponentValidator for RecordingValidator {
    fn validate(&self, request: ValidationRequest<'_>, operation: OperationType) -> OperationResult<()> {
        let id = request.component().map(|c| c.id.clone()).unwrap_or_default();
        self.calls.lock().push((operation, id));
        match &self.rejection {
            Some(message) => Err(FailedOperation::single(
                message.clone(),
                Problem::new(message.clone()).with_solution("Fix the component and retry"),
            )),
            None => Ok(()),
        }
    }
}

/// Validation configuration using one shared validator for every kind
pub fn shared_validation(validator: &Arc<RecordingValidator>) -> ValidationConfiguration {
    ComponentKind::ALL
        .into_iter()
        .fold(ValidationConfiguration::new(), |config, kind| {
            config.with_shared_validator(kind, validator.clone())
        })
}

/// Provisioner recording the component ids it handled
#[derive(Debug, Default)]
pub struct RecordingProvisioner {
    handled: Mutex<Vec<String>>,
}

impl RecordingProvisioner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn handled(&self) -> Vec<String> {
        self.handled.lock().clone()
    }

    fn record(&self, entry: String) {
        self.handled.lock().push(entry);
    }
}

impl Provisioner for RecordingProvisioner {
    fn provision(&self, request: &ProvisionOperationRequest) -> OperationResult<ProvisionInfo> {
        let id = request.component().map(|c| c.id.clone()).unwrap_or_default();
        self.record(format!("provision {id}"));
        Ok(ProvisionInfo::default()
            .with_public_info(json!({"component": id}))
            .with_log(Log::info("provisioned")))
    }

    fn unprovision(&self, request: &ProvisionOperationRequest) -> OperationResult<ProvisionInfo> {
        let id = request.component().map(|c| c.id.clone()).unwrap_or_default();
        self.record(format!("unprovision {id} remove_data={}", request.remove_data()));
        Ok(ProvisionInfo::default())
    }

    fn update_acl(&self, request: &AccessControlOperationRequest) -> OperationResult<ProvisionInfo> {
        let refs: Vec<&str> = request.refs().iter().map(String::as_str).collect();
        self.record(format!("update_acl {}", refs.join(",")));
        Ok(ProvisionInfo::default())
    }

    fn reverse_provision(
        &self,
        request: &ReverseProvisionOperationRequest,
    ) -> OperationResult<ReverseProvisionInfo> {
        let params = request.params_as::<S3ImportParams>().cloned();
        self.record(format!("reverse_provision {}", request.use_case_template_id()));
        Ok(ReverseProvisionInfo::new(json!({
            "spec.mesh.specific.bucket": params.map(|p| p.bucket),
        })))
    }
}

/// Provision configuration using one shared provisioner for every kind
pub fn shared_provision(provisioner: &Arc<RecordingProvisioner>) -> ProvisionConfiguration {
    ComponentKind::ALL
        .into_iter()
        .fold(ProvisionConfiguration::new(), |config, kind| {
            config.with_shared_provisioner(kind, provisioner.clone())
        })
}
