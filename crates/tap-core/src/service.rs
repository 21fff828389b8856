//! Tech adapter service
//!
//! Entry points of the five operation flows. Each call is a single
//! synchronous pass: the dispatcher builds and validates the typed request,
//! then the provisioner registered for the component kind handles it.
//! Handler failures are returned exactly as the handler produced them.

use crate::api::{ProvisioningRequest, ReverseProvisioningRequest, UpdateAclRequest};
use crate::config::AdapterConfig;
use crate::dispatcher::{kind_to_provision, parse_component_kind, KindDispatcher};
use crate::provider::{
    ComponentClassProvider, ComponentClassRegistry, SpecificClassProvider, SpecificClassRegistry,
};
use crate::provision::{ProvisionConfiguration, Provisioner};
use crate::validation::ValidationConfiguration;
use std::sync::Arc;
use tap_model::{
    OperationResult, OperationType, ProvisionOperationRequest, ProvisionOperationStatus,
    ReverseProvisionOperationStatus, ValidationInfo,
};

/// Runs the operation flows of a tech adapter
#[derive(Debug, Clone)]
pub struct TechAdapterService {
    dispatcher: KindDispatcher,
    provision: ProvisionConfiguration,
}

impl TechAdapterService {
    /// Start assembling a service
    #[inline]
    #[must_use]
    pub fn builder() -> TechAdapterServiceBuilder {
        TechAdapterServiceBuilder::default()
    }

    /// Validate a request without provisioning anything
    #[must_use]
    pub fn validate(&self, request: &ProvisioningRequest) -> ValidationInfo {
        match self.dispatcher.validate(request, OperationType::Validate) {
            Ok(_) => ValidationInfo::valid(),
            Err(failed) => {
                tracing::info!("Request is not valid: {}", failed);
                ValidationInfo::invalid(failed.error_messages())
            }
        }
    }

    /// Provision the component described by `request`
    ///
    /// # Errors
    /// Returns the validation failure or the provisioner failure unchanged
    pub fn provision(&self, request: &ProvisioningRequest) -> OperationResult<ProvisionOperationStatus> {
        let validated = self.dispatcher.validate(request, OperationType::Provision)?;
        let info = self.provisioner_for(&validated)?.provision(&validated)?;
        tracing::info!("Provision completed");
        Ok(ProvisionOperationStatus::completed(OperationType::Provision, info))
    }

    /// Unprovision the component described by `request`
    ///
    /// # Errors
    /// Returns the validation failure or the provisioner failure unchanged
    pub fn unprovision(&self, request: &ProvisioningRequest) -> OperationResult<ProvisionOperationStatus> {
        let validated = self.dispatcher.validate(request, OperationType::Unprovision)?;
        let info = self.provisioner_for(&validated)?.unprovision(&validated)?;
        tracing::info!("Unprovision completed, remove data: {}", validated.remove_data());
        Ok(ProvisionOperationStatus::completed(OperationType::Unprovision, info))
    }

    /// Grant the request refs access to the component
    ///
    /// # Errors
    /// Returns the validation failure or the provisioner failure unchanged
    pub fn update_acl(&self, request: &UpdateAclRequest) -> OperationResult<ProvisionOperationStatus> {
        let validated = self.dispatcher.validate_update_acl(request)?;
        let kind = kind_to_provision(validated.operation_request())?;
        let info = self.provision.provisioner(kind).update_acl(&validated)?;
        tracing::info!("Access control update completed for {} refs", validated.refs().len());
        Ok(ProvisionOperationStatus::completed(OperationType::UpdateAcl, info))
    }

    /// Import an existing resource into a component description
    ///
    /// # Errors
    /// Returns the validation failure or the provisioner failure unchanged
    pub fn reverse_provision(
        &self,
        request: &ReverseProvisioningRequest,
    ) -> OperationResult<ReverseProvisionOperationStatus> {
        let validated = self.dispatcher.validate_reverse_provision(request)?;
        let kind = parse_component_kind(validated.component_kind()?)?;
        let info = self.provision.provisioner(kind).reverse_provision(&validated)?;
        tracing::info!("Reverse provisioning completed for {} component", kind);
        Ok(ReverseProvisionOperationStatus::completed(info))
    }

    fn provisioner_for(
        &self,
        request: &ProvisionOperationRequest,
    ) -> OperationResult<&dyn Provisioner> {
        let kind = kind_to_provision(request.operation_request())?;
        Ok(self.provision.provisioner(kind))
    }
}

/// Builder for [`TechAdapterService`]
///
/// Unset resolvers resolve nothing; unset handlers reject every request.
#[derive(Default)]
pub struct TechAdapterServiceBuilder {
    component_classes: Option<Arc<dyn ComponentClassProvider>>,
    specific_classes: Option<Arc<dyn SpecificClassProvider>>,
    validation: ValidationConfiguration,
    provision: ProvisionConfiguration,
}

impl TechAdapterServiceBuilder {
    /// Set the component schema resolver
    #[must_use]
    pub fn with_component_classes(mut self, provider: impl ComponentClassProvider + 'static) -> Self {
        self.component_classes = Some(Arc::new(provider));
        self
    }

    /// Set the payload schema resolver
    #[must_use]
    pub fn with_specific_classes(mut self, provider: impl SpecificClassProvider + 'static) -> Self {
        self.specific_classes = Some(Arc::new(provider));
        self
    }

    /// Set both resolvers from a configuration
    #[must_use]
    pub fn with_config(self, config: &AdapterConfig) -> Self {
        self.with_component_classes(config.component_registry())
            .with_specific_classes(config.specific_registry())
    }

    /// Set the per-kind validators
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationConfiguration) -> Self {
        self.validation = validation;
        self
    }

    /// Set the per-kind provisioners
    #[must_use]
    pub fn with_provision(mut self, provision: ProvisionConfiguration) -> Self {
        self.provision = provision;
        self
    }

    /// Assemble the service
    #[must_use]
    pub fn build(self) -> TechAdapterService {
        let component_classes = self
            .component_classes
            .unwrap_or_else(|| Arc::new(ComponentClassRegistry::new()));
        let specific_classes = self
            .specific_classes
            .unwrap_or_else(|| Arc::new(SpecificClassRegistry::new()));
        TechAdapterService {
            dispatcher: KindDispatcher::new(component_classes, specific_classes, self.validation),
            provision: self.provision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::AcceptAllValidator;
    use serde_json::json;
    use tap_model::{
        FailedOperation, OperationStatus, ProvisionInfo, ReverseProvisionInfo,
        ReverseProvisionOperationRequest, SpecificSchema,
    };

    const TEMPLATE: &str = "urn:dmb:utm:airflow-workload-template:0.0.0";

    const DESCRIPTOR: &str = r"
dataProduct:
  id: urn:dmb:dp:finance:sales:0
  components:
    - id: urn:dmb:cmp:finance:sales:0:job
      name: job
      description: nightly job
      kind: workload
      useCaseTemplateId: urn:dmb:utm:airflow-workload-template:0.0.0
      specific:
        dag: sales_nightly
componentIdToProvision: urn:dmb:cmp:finance:sales:0:job
";

    struct Workloads;

    impl Provisioner for Workloads {
        fn provision(&self, request: &ProvisionOperationRequest) -> OperationResult<ProvisionInfo> {
            let id = request.component().map(|c| c.id.clone()).unwrap_or_default();
            Ok(ProvisionInfo::default().with_public_info(json!({"deployed": id})))
        }

        fn reverse_provision(
            &self,
            request: &ReverseProvisionOperationRequest,
        ) -> OperationResult<ReverseProvisionInfo> {
            Ok(ReverseProvisionInfo::new(json!({"environment": request.environment()})))
        }
    }

    fn service() -> TechAdapterService {
        TechAdapterService::builder()
            .with_component_classes(ComponentClassRegistry::default_components(None, Some(TEMPLATE), None))
            .with_specific_classes(
                SpecificClassRegistry::new()
                    .with_default_specific(SpecificSchema::passthrough())
                    .with_reverse_provision_params(TEMPLATE, SpecificSchema::passthrough()),
            )
            .with_validation(ValidationConfiguration::new().with_workload_validator(AcceptAllValidator))
            .with_provision(ProvisionConfiguration::new().with_workload_provisioner(Workloads))
            .build()
    }

    #[test]
    fn validate_reports_valid() {
        assert_eq!(
            service().validate(&ProvisioningRequest::component(DESCRIPTOR)),
            ValidationInfo::valid()
        );
    }

    #[test]
    fn validate_lists_message_then_problems() {
        let info = TechAdapterService::builder()
            .build()
            .validate(&ProvisioningRequest::component(DESCRIPTOR));
        assert!(!info.valid);
        assert_eq!(
            info.errors[0],
            "The service doesn't support the received component descriptor. Cannot find configuration on how to parse the component."
        );
        assert_eq!(info.errors.len(), 2);
    }

    #[test]
    fn provision_completes() {
        let status = service().provision(&ProvisioningRequest::component(DESCRIPTOR)).unwrap();
        assert_eq!(status.status, OperationStatus::Completed);
        assert_eq!(status.operation_type, OperationType::Provision);
        assert_eq!(
            status.info.and_then(|i| i.public_info),
            Some(json!({"deployed": "urn:dmb:cmp:finance:sales:0:job"}))
        );
    }

    #[test]
    fn handler_failure_passes_through() {
        let failed = service()
            .unprovision(&ProvisioningRequest::component(DESCRIPTOR))
            .unwrap_err();
        assert_eq!(
            failed.message(),
            "Unprovision for the operation request is not supported"
        );
    }

    #[test]
    fn reverse_provision_dispatches_on_catalog_kind() {
        let request = ReverseProvisioningRequest::new(TEMPLATE, "qa")
            .with_params(json!({"dag": "legacy"}))
            .with_catalog_info(json!({"spec": {"mesh": {"kind": "workload"}}}));
        let status = service().reverse_provision(&request).unwrap();
        assert_eq!(
            status.info.and_then(|i| i.updates),
            Some(json!({"environment": "qa"}))
        );
    }

    #[test]
    fn reverse_provision_rejects_unknown_catalog_kind() {
        let request = ReverseProvisioningRequest::new(TEMPLATE, "qa")
            .with_params(json!({}))
            .with_catalog_info(json!({"spec": {"mesh": {"kind": "system"}}}));
        let failed: FailedOperation = service().reverse_provision(&request).unwrap_err();
        assert!(failed.message().contains("'system'"));
    }
}
