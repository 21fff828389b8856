//! Per-kind provisioning handlers
//!
//! Every [`Provisioner`] operation defaults to an "unsupported"
//! failure, so a handler only implements what its kind actually supports.

use std::fmt;
use std::sync::Arc;
use tap_model::{
    AccessControlOperationRequest, ComponentKind, FailedOperation, OperationResult, Problem,
    ProvisionInfo, ProvisionOperationRequest, ReverseProvisionInfo,
    ReverseProvisionOperationRequest, PLATFORM_TEAM_SOLUTION,
};

const PROVISION_SETUP_SOLUTION: &str = "Ensure that the adapter is registered correctly for this type of request and that the ProvisionConfiguration is set up to support the requested component";

fn unsupported(message: &str, problem: &str) -> FailedOperation {
    FailedOperation::single(
        message,
        Problem::new(problem).with_solutions([PROVISION_SETUP_SOLUTION, PLATFORM_TEAM_SOLUTION]),
    )
}

/// Handles the operations of one component kind
pub trait Provisioner: Send + Sync {
    /// Provision the component
    ///
    /// # Errors
    /// Returns the failure raised by the handler
    fn provision(&self, request: &ProvisionOperationRequest) -> OperationResult<ProvisionInfo> {
        let _ = request;
        Err(unsupported(
            "Provision for the operation request is not supported",
            "This adapter doesn't support provisioning for the received request",
        ))
    }

    /// Unprovision the component
    ///
    /// # Errors
    /// Returns the failure raised by the handler
    fn unprovision(&self, request: &ProvisionOperationRequest) -> OperationResult<ProvisionInfo> {
        let _ = request;
        Err(unsupported(
            "Unprovision for the operation request is not supported",
            "This adapter doesn't support unprovisioning for the received request",
        ))
    }

    /// Grant access to the request refs
    ///
    /// # Errors
    /// Returns the failure raised by the handler
    fn update_acl(&self, request: &AccessControlOperationRequest) -> OperationResult<ProvisionInfo> {
        let _ = request;
        Err(unsupported(
            "Access control lists update for the operation request is not supported",
            "This adapter doesn't support updating access control lists for the received request",
        ))
    }

    /// Import an existing resource into a component description
    ///
    /// # Errors
    /// Returns the failure raised by the handler
    fn reverse_provision(
        &self,
        request: &ReverseProvisionOperationRequest,
    ) -> OperationResult<ReverseProvisionInfo> {
        let _ = request;
        Err(unsupported(
            "Reverse provisioning for the operation request is not supported",
            "This adapter doesn't support reverse provisioning for the received request",
        ))
    }
}

/// Provisioner supporting nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedProvisioner;

impl Provisioner for UnsupportedProvisioner {}

/// One provisioner per component kind
#[derive(Clone)]
pub struct ProvisionConfiguration {
    storage: Arc<dyn Provisioner>,
    workload: Arc<dyn Provisioner>,
    output_port: Arc<dyn Provisioner>,
}

impl ProvisionConfiguration {
    /// Configuration supporting nothing
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage provisioner
    #[must_use]
    pub fn with_storage_provisioner(mut self, provisioner: impl Provisioner + 'static) -> Self {
        self.storage = Arc::new(provisioner);
        self
    }

    /// Set the workload provisioner
    #[must_use]
    pub fn with_workload_provisioner(mut self, provisioner: impl Provisioner + 'static) -> Self {
        self.workload = Arc::new(provisioner);
        self
    }

    /// Set the output port provisioner
    #[must_use]
    pub fn with_output_port_provisioner(mut self, provisioner: impl Provisioner + 'static) -> Self {
        self.output_port = Arc::new(provisioner);
        self
    }

    /// Set the provisioner for `kind` from a shared handle
    #[must_use]
    pub fn with_shared_provisioner(
        mut self,
        kind: ComponentKind,
        provisioner: Arc<dyn Provisioner>,
    ) -> Self {
        match kind {
            ComponentKind::Storage => self.storage = provisioner,
            ComponentKind::Workload => self.workload = provisioner,
            ComponentKind::OutputPort => self.output_port = provisioner,
        }
        self
    }

    /// Provisioner serving `kind`
    #[must_use]
    pub fn provisioner(&self, kind: ComponentKind) -> &dyn Provisioner {
        match kind {
            ComponentKind::Storage => self.storage.as_ref(),
            ComponentKind::Workload => self.workload.as_ref(),
            ComponentKind::OutputPort => self.output_port.as_ref(),
        }
    }
}

impl Default for ProvisionConfiguration {
    fn default() -> Self {
        Self {
            storage: Arc::new(UnsupportedProvisioner),
            workload: Arc::new(UnsupportedProvisioner),
            output_port: Arc::new(UnsupportedProvisioner),
        }
    }
}

impl fmt::Debug for ProvisionConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionConfiguration").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tap_model::{DataProduct, OperationRequest};

    #[test]
    fn defaults_report_each_operation() {
        let provisioner = UnsupportedProvisioner;
        let request =
            ProvisionOperationRequest::new(OperationRequest::new(DataProduct::default(), None), true);
        assert_eq!(
            provisioner.provision(&request).unwrap_err().message(),
            "Provision for the operation request is not supported"
        );
        assert_eq!(
            provisioner.unprovision(&request).unwrap_err().message(),
            "Unprovision for the operation request is not supported"
        );

        let acl = AccessControlOperationRequest::new(OperationRequest::new(DataProduct::default(), None), Vec::new());
        assert_eq!(
            provisioner.update_acl(&acl).unwrap_err().message(),
            "Access control lists update for the operation request is not supported"
        );

        let reverse = ReverseProvisionOperationRequest::new("urn:tpl", "dev", Box::new(json!({})), json!({}));
        let failed = provisioner.reverse_provision(&reverse).unwrap_err();
        assert_eq!(failed.message(), "Reverse provisioning for the operation request is not supported");
        assert!(failed.problems()[0].solutions().contains(PLATFORM_TEAM_SOLUTION));
    }

    #[test]
    fn configuration_routes_by_kind() {
        struct Fixed;
        impl Provisioner for Fixed {
            fn provision(&self, _request: &ProvisionOperationRequest) -> OperationResult<ProvisionInfo> {
                Ok(ProvisionInfo::default())
            }
        }

        let config = ProvisionConfiguration::new().with_workload_provisioner(Fixed);
        let request =
            ProvisionOperationRequest::new(OperationRequest::new(DataProduct::default(), None), false);
        assert!(config.provisioner(ComponentKind::Workload).provision(&request).is_ok());
        assert!(config.provisioner(ComponentKind::Storage).provision(&request).is_err());
    }
}
