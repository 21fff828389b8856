//! Dry-run handlers
//!
//! The command line runner has no infrastructure to talk to. Its
//! provisioner reports what it received instead of touching anything.

use serde_json::json;
use tap_core::Provisioner;
use tap_model::{
    AccessControlOperationRequest, FailedOperation, Log, OperationResult, Problem, ProvisionInfo,
    ProvisionOperationRequest, ReverseProvisionInfo, ReverseProvisionOperationRequest,
};

/// Provisioner echoing the decoded request back as public info
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DryRunProvisioner;

impl DryRunProvisioner {
    fn describe(request: &ProvisionOperationRequest, phase: &str) -> OperationResult<ProvisionInfo> {
        let component = match request.component() {
            Some(component) => component.to_tree().map_err(|e| {
                FailedOperation::single(
                    "Failed to render the decoded component",
                    Problem::with_cause("Component couldn't be serialized", e),
                )
            })?,
            None => json!(null),
        };
        Ok(ProvisionInfo::default()
            .with_public_info(json!({ "component": component, "removeData": request.remove_data() }))
            .with_log(Log::info("dry run, nothing was changed").with_phase(phase)))
    }
}

impl Provisioner for DryRunProvisioner {
    fn provision(&self, request: &ProvisionOperationRequest) -> OperationResult<ProvisionInfo> {
        Self::describe(request, "provision")
    }

    fn unprovision(&self, request: &ProvisionOperationRequest) -> OperationResult<ProvisionInfo> {
        Self::describe(request, "unprovision")
    }

    fn update_acl(&self, request: &AccessControlOperationRequest) -> OperationResult<ProvisionInfo> {
        Ok(ProvisionInfo::default()
            .with_public_info(json!({ "refs": request.refs() }))
            .with_log(Log::info("dry run, nothing was changed").with_phase("update_acl")))
    }

    fn reverse_provision(
        &self,
        request: &ReverseProvisionOperationRequest,
    ) -> OperationResult<ReverseProvisionInfo> {
        let params = request.params().to_tree().map_err(|e| {
            FailedOperation::single(
                "Failed to render the decoded params",
                Problem::with_cause("Params couldn't be serialized", e),
            )
        })?;
        Ok(ReverseProvisionInfo::new(json!({ "spec.mesh.specific": params }))
            .with_log(Log::info("dry run, nothing was imported").with_phase("reverse_provision")))
    }
}
