//! Kind dispatcher
//!
//! Turns raw operation inputs into typed requests and runs the validator
//! registered for the component kind. Every step returns an
//! [`OperationResult`]; the first failure ends the flow.
//!
//! Provision, unprovision and validate go through:
//! 1. descriptor kind check
//! 2. descriptor parsing
//! 3. component lookup by id
//! 4. template id lookup
//! 5. component and specific schema resolution
//! 6. component decoding
//! 7. kind check on the decoded component
//! 8. request assembly
//! 9. validator call
//!
//! Reverse provisioning never touches a descriptor: it reads the kind from
//! the catalog info and decodes the params with the reverse provisioning
//! schema of the template id.

use crate::api::{ProvisioningRequest, ReverseProvisioningRequest, UpdateAclRequest};
use crate::provider::{ComponentClassProvider, SpecificClassProvider};
use crate::validation::ValidationConfiguration;
use std::fmt;
use std::sync::Arc;
use tap_model::{
    decoder, reader, AccessControlOperationRequest, ComponentKind, DescriptorKind,
    FailedOperation, OperationRequest, OperationResult, OperationType, Problem,
    ProvisionOperationRequest, ReverseProvisionOperationRequest, ValidationRequest,
    PLATFORM_TEAM_SOLUTION,
};

/// Builds typed requests and validates them per component kind
#[derive(Clone)]
pub struct KindDispatcher {
    component_classes: Arc<dyn ComponentClassProvider>,
    specific_classes: Arc<dyn SpecificClassProvider>,
    validation: ValidationConfiguration,
}

impl KindDispatcher {
    /// Create dispatcher
    #[must_use]
    pub fn new(
        component_classes: Arc<dyn ComponentClassProvider>,
        specific_classes: Arc<dyn SpecificClassProvider>,
        validation: ValidationConfiguration,
    ) -> Self {
        Self {
            component_classes,
            specific_classes,
            validation,
        }
    }

    /// Build and validate a provision, unprovision or validate request
    ///
    /// # Errors
    /// Returns the first failure among descriptor checks, decoding and the
    /// validator registered for the component kind
    pub fn validate(
        &self,
        request: &ProvisioningRequest,
        operation: OperationType,
    ) -> OperationResult<ProvisionOperationRequest> {
        tracing::info!("Validating {} request", operation);
        check_descriptor_kind(&request.descriptor_kind)?;

        let operation_request = self.parse_operation_request(&request.descriptor)?;
        let kind = kind_to_provision(&operation_request)?;

        let enriched = request
            .latest_enriched_descriptor
            .clone()
            .map(reader::to_tree)
            .transpose()?;

        let provision_request = ProvisionOperationRequest::new(operation_request, request.remove_data)
            .with_latest_enriched_descriptor(enriched);

        self.validation
            .validator(kind)
            .validate(ValidationRequest::Provision(&provision_request), operation)
            .map_err(|failed| {
                tracing::warn!("Validation failed for {} component: {}", kind, failed);
                failed
            })?;

        tracing::info!("Validation of {} component succeeded", kind);
        Ok(provision_request)
    }

    /// Build and validate an access control update request
    ///
    /// # Errors
    /// Returns the first failure among decoding of the prior descriptor and
    /// the validator registered for the component kind
    pub fn validate_update_acl(
        &self,
        request: &UpdateAclRequest,
    ) -> OperationResult<AccessControlOperationRequest> {
        tracing::info!("Validating access control update for {} refs", request.refs.len());
        let operation_request = self.parse_operation_request(&request.provision_info.request)?;
        let kind = kind_to_provision(&operation_request)?;

        let acl_request = AccessControlOperationRequest::new(operation_request, request.refs.iter().cloned());

        self.validation
            .validator(kind)
            .validate(
                ValidationRequest::AccessControl(&acl_request),
                OperationType::UpdateAcl,
            )
            .map_err(|failed| {
                tracing::warn!("Validation failed for {} component: {}", kind, failed);
                failed
            })?;

        Ok(acl_request)
    }

    /// Build a reverse provisioning request
    ///
    /// # Errors
    /// Returns a failure when catalog info or params are missing or
    /// malformed, when no params schema is registered for the template id,
    /// or when the catalog info carries no supported kind
    pub fn validate_reverse_provision(
        &self,
        request: &ReverseProvisioningRequest,
    ) -> OperationResult<ReverseProvisionOperationRequest> {
        let template_id = request.use_case_template_id.as_str();
        tracing::info!("Validating reverse provisioning request for '{}'", template_id);

        let catalog_info = request.catalog_info.clone().ok_or_else(|| {
            let message = "Received Reverse provisioning request with empty catalog info. Operation cannot be performed";
            FailedOperation::single(message, Problem::new(message).with_solution(PLATFORM_TEAM_SOLUTION))
        })?;
        let catalog_info = reader::to_tree(catalog_info)?;

        let params_schema = self
            .specific_classes
            .resolve_reverse_params(template_id)
            .ok_or_else(|| {
                FailedOperation::single(
                    "The service doesn't support reverse provisioning for received component. Cannot find configuration on how to parse the 'params' field.",
                    Problem::new(format!(
                        "No Specific class provided for reverse provisioning for useCaseTemplateId '{template_id}'"
                    ))
                    .with_solution(PLATFORM_TEAM_SOLUTION),
                )
            })?;

        let params = request.params.clone().ok_or_else(|| {
            let message = "The request input doesn't contain parameters to perform reverse provisioning";
            FailedOperation::single(message, Problem::new(message).with_solution(PLATFORM_TEAM_SOLUTION))
                .with_input(serde_json::to_string(request).unwrap_or_default())
                .with_input_error_field("params")
        })?;
        let params = reader::to_tree(params)?;
        let params = decoder::decode_with_schema(&params, &params_schema)?;
        tracing::debug!("Decoded reverse provisioning params as {}", params_schema.name());

        let reverse_request = ReverseProvisionOperationRequest::new(
            template_id,
            request.environment.clone(),
            params,
            catalog_info,
        );
        let kind = parse_component_kind(reverse_request.component_kind()?)?;
        tracing::info!("Reverse provisioning request targets a {} component", kind);

        Ok(reverse_request)
    }

    /// Descriptor text into a data product plus its typed component
    fn parse_operation_request(&self, descriptor_text: &str) -> OperationResult<OperationRequest> {
        let descriptor = reader::parse_descriptor(descriptor_text)?;
        let component_id = descriptor.component_id_to_provision.as_str();
        let data_product = &descriptor.data_product;

        let node = data_product.component_to_provision(component_id).ok_or_else(|| {
            FailedOperation::simple(format!(
                "The component with ID '{component_id}' wasn't found in the received descriptor"
            ))
            .with_input_error_field("dataProduct.components")
        })?;

        let template_id = reader::template_id(node).ok_or_else(|| {
            FailedOperation::simple(format!(
                "Couldn't retrieve '{}' field for the component with ID '{component_id}'",
                reader::TEMPLATE_ID_FIELD
            ))
            .with_input_error_field(format!(
                "dataProduct.components.[(@.id == '{component_id}')].{}",
                reader::TEMPLATE_ID_FIELD
            ))
        })?;

        let component_schema = self.component_classes.resolve(template_id).ok_or_else(|| {
            FailedOperation::single(
                "The service doesn't support the received component descriptor. Cannot find configuration on how to parse the component.",
                Problem::new(format!(
                    "No model class provided on ComponentClassProvider for component with useCaseTemplateId '{template_id}'"
                ))
                .with_solution(PLATFORM_TEAM_SOLUTION),
            )
        })?;

        let specific_schema = self.specific_classes.resolve(template_id).ok_or_else(|| {
            FailedOperation::single(
                "The service doesn't support the received component descriptor. Cannot find configuration on how to parse the 'specific' field.",
                Problem::new(format!(
                    "No Specific class provided on SpecificClassProvider for useCaseTemplateId '{template_id}'"
                ))
                .with_solution(PLATFORM_TEAM_SOLUTION),
            )
        })?;

        tracing::debug!(
            "Decoding component '{}' as {} with specific {}",
            component_id,
            component_schema,
            specific_schema.name()
        );
        let component = decoder::decode_component(node, &component_schema, &specific_schema)?;

        Ok(OperationRequest::new(descriptor.data_product, Some(component)))
    }
}

impl fmt::Debug for KindDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindDispatcher")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

/// Parse a component kind string
///
/// # Errors
/// Returns a failure naming the kind when it is outside the supported set
pub fn parse_component_kind(kind: &str) -> OperationResult<ComponentKind> {
    kind.parse().map_err(|_| {
        FailedOperation::simple(format!(
            "The received component is of kind '{kind}' which is not supported by the framework"
        ))
    })
}

/// Kind of the component carried by `request`
///
/// # Errors
/// Returns a failure when the component is missing, has no kind, or has an
/// unsupported kind
pub fn kind_to_provision(request: &OperationRequest) -> OperationResult<ComponentKind> {
    request
        .component_kind_to_provision()
        .and_then(parse_component_kind)
}

fn check_descriptor_kind(kind: &str) -> OperationResult<()> {
    if kind.parse::<DescriptorKind>() == Ok(DescriptorKind::ComponentDescriptor) {
        return Ok(());
    }
    tracing::warn!("Rejecting request with descriptor kind {}", kind);
    Err(FailedOperation::single(
        "The service doesn't support the received kind of descriptor. See the error details for more information",
        Problem::new(format!(
            "Received descriptorKind not supported by the framework. Expected: '{}', Actual: '{kind}'",
            DescriptorKind::ComponentDescriptor
        ))
        .with_solution(PLATFORM_TEAM_SOLUTION),
    )
    .with_input_error_field("descriptorKind"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{
        ComponentClassRegistry, MockComponentClassProvider, MockSpecificClassProvider,
        SpecificClassRegistry,
    };
    use crate::validation::AcceptAllValidator;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tap_model::{ComponentSchema, SpecificSchema};

    const STORAGE_TEMPLATE: &str = "urn:dmb:utm:s3-storage-template:0.0.0";

    const DESCRIPTOR: &str = r"
dataProduct:
  id: urn:dmb:dp:finance:sales:0
  name: sales
  components:
    - id: urn:dmb:cmp:finance:sales:0:raw
      name: raw
      description: raw files
      kind: storage
      useCaseTemplateId: urn:dmb:utm:s3-storage-template:0.0.0
      specific:
        bucket: sales-raw
componentIdToProvision: urn:dmb:cmp:finance:sales:0:raw
";

    fn dispatcher() -> KindDispatcher {
        KindDispatcher::new(
            Arc::new(ComponentClassRegistry::default_components(Some(STORAGE_TEMPLATE), None, None)),
            Arc::new(SpecificClassRegistry::new().with_specific(STORAGE_TEMPLATE, SpecificSchema::passthrough())),
            ValidationConfiguration::new().with_storage_validator(AcceptAllValidator),
        )
    }

    #[test]
    fn validates_storage_component() {
        let request = dispatcher()
            .validate(&ProvisioningRequest::component(DESCRIPTOR), OperationType::Validate)
            .unwrap();
        let component = request.component().unwrap();
        assert_eq!(component.kind, "storage");
        assert_eq!(component.specific_as::<Value>(), Some(&json!({"bucket": "sales-raw"})));
    }

    #[test]
    fn rejects_data_product_descriptors_before_parsing() {
        let request = ProvisioningRequest::component("not even yaml: [")
            .with_descriptor_kind(DescriptorKind::DataproductDescriptor);
        let failed = dispatcher().validate(&request, OperationType::Provision).unwrap_err();
        assert_eq!(failed.input_error_field(), Some("descriptorKind"));
        assert_eq!(
            failed.problems()[0].description(),
            "Received descriptorKind not supported by the framework. Expected: 'COMPONENT_DESCRIPTOR', Actual: 'DATAPRODUCT_DESCRIPTOR'"
        );
    }

    #[test]
    fn unknown_descriptor_kind_fails_the_kind_check() {
        let request = ProvisioningRequest::component(DESCRIPTOR).with_descriptor_kind("FOO");
        let failed = dispatcher().validate(&request, OperationType::Validate).unwrap_err();
        assert_eq!(failed.input_error_field(), Some("descriptorKind"));
        assert_eq!(
            failed.message(),
            "The service doesn't support the received kind of descriptor. See the error details for more information"
        );
        assert_eq!(
            failed.problems()[0].description(),
            "Received descriptorKind not supported by the framework. Expected: 'COMPONENT_DESCRIPTOR', Actual: 'FOO'"
        );
    }

    #[test]
    fn missing_component_names_components_path() {
        let descriptor = DESCRIPTOR.replace(
            "componentIdToProvision: urn:dmb:cmp:finance:sales:0:raw",
            "componentIdToProvision: urn:dmb:cmp:finance:sales:0:other",
        );
        let failed = dispatcher()
            .validate(&ProvisioningRequest::component(descriptor), OperationType::Validate)
            .unwrap_err();
        assert_eq!(failed.input_error_field(), Some("dataProduct.components"));
        assert_eq!(
            failed.message(),
            "The component with ID 'urn:dmb:cmp:finance:sales:0:other' wasn't found in the received descriptor"
        );
    }

    #[test]
    fn unresolved_template_fails_with_component_message() {
        let dispatcher = KindDispatcher::new(
            Arc::new(ComponentClassRegistry::new()),
            Arc::new(SpecificClassRegistry::new()),
            ValidationConfiguration::new(),
        );
        let failed = dispatcher
            .validate(&ProvisioningRequest::component(DESCRIPTOR), OperationType::Validate)
            .unwrap_err();
        assert_eq!(
            failed.problems()[0].description(),
            format!("No model class provided on ComponentClassProvider for component with useCaseTemplateId '{STORAGE_TEMPLATE}'")
        );
    }

    #[test]
    fn unresolved_specific_fails_with_specific_message() {
        let dispatcher = KindDispatcher::new(
            Arc::new(ComponentClassRegistry::new().with_default_class(ComponentSchema::StorageArea)),
            Arc::new(SpecificClassRegistry::new()),
            ValidationConfiguration::new(),
        );
        let failed = dispatcher
            .validate(&ProvisioningRequest::component(DESCRIPTOR), OperationType::Validate)
            .unwrap_err();
        assert!(failed.message().contains("'specific' field"));
    }

    #[test]
    fn unsupported_kind_is_named() {
        let descriptor = DESCRIPTOR.replace("kind: storage", "kind: bucket");
        let dispatcher = KindDispatcher::new(
            Arc::new(ComponentClassRegistry::new().with_default_class(ComponentSchema::custom("Bucket"))),
            Arc::new(SpecificClassRegistry::new().with_default_specific(SpecificSchema::passthrough())),
            ValidationConfiguration::new(),
        );
        let failed = dispatcher
            .validate(&ProvisioningRequest::component(descriptor), OperationType::Validate)
            .unwrap_err();
        assert_eq!(
            failed.message(),
            "The received component is of kind 'bucket' which is not supported by the framework"
        );
    }

    #[test]
    fn default_validator_rejects() {
        let dispatcher = KindDispatcher::new(
            Arc::new(ComponentClassRegistry::default_components(Some(STORAGE_TEMPLATE), None, None)),
            Arc::new(SpecificClassRegistry::new().with_default_specific(SpecificSchema::passthrough())),
            ValidationConfiguration::new(),
        );
        let failed = dispatcher
            .validate(&ProvisioningRequest::component(DESCRIPTOR), OperationType::Provision)
            .unwrap_err();
        assert_eq!(failed.message(), "Validation for the operation request not supported");
    }

    #[test]
    fn enriched_descriptor_text_becomes_tree() {
        let request = ProvisioningRequest::component(DESCRIPTOR)
            .with_latest_enriched_descriptor(json!("dataProduct:\n  id: x\n"));
        let validated = dispatcher().validate(&request, OperationType::Provision).unwrap();
        assert_eq!(
            validated.latest_enriched_descriptor(),
            Some(&json!({"dataProduct": {"id": "x"}}))
        );
    }

    #[test]
    fn update_acl_reads_prior_descriptor() {
        let request = UpdateAclRequest::new(vec!["user:alice".into()], DESCRIPTOR);
        let acl = dispatcher().validate_update_acl(&request).unwrap();
        assert_eq!(acl.refs().len(), 1);
        assert_eq!(acl.component().map(|c| c.kind.as_str()), Some("storage"));
    }

    #[test]
    fn reverse_provision_never_resolves_components() {
        let mut components = MockComponentClassProvider::new();
        components.expect_resolve().never();
        let mut specifics = MockSpecificClassProvider::new();
        specifics.expect_resolve().never();
        specifics
            .expect_resolve_reverse_params()
            .times(1)
            .returning(|_| Some(SpecificSchema::passthrough()));

        let dispatcher = KindDispatcher::new(
            Arc::new(components),
            Arc::new(specifics),
            ValidationConfiguration::new(),
        );
        let request = ReverseProvisioningRequest::new(STORAGE_TEMPLATE, "development")
            .with_params(json!({"bucket": "legacy"}))
            .with_catalog_info(json!({"spec": {"mesh": {"kind": "storage"}}}));
        let reverse = dispatcher.validate_reverse_provision(&request).unwrap();
        assert_eq!(reverse.component_kind(), Ok("storage"));
        assert_eq!(reverse.params_as::<Value>(), Some(&json!({"bucket": "legacy"})));
    }

    #[test]
    fn reverse_provision_requires_catalog_info() {
        let request = ReverseProvisioningRequest::new(STORAGE_TEMPLATE, "development").with_params(json!({}));
        let failed = dispatcher().validate_reverse_provision(&request).unwrap_err();
        assert_eq!(
            failed.message(),
            "Received Reverse provisioning request with empty catalog info. Operation cannot be performed"
        );
        assert!(failed.problems()[0].solutions().contains(PLATFORM_TEAM_SOLUTION));
    }

    #[test]
    fn reverse_provision_requires_params_schema() {
        let request = ReverseProvisioningRequest::new(STORAGE_TEMPLATE, "development")
            .with_catalog_info(json!({"spec": {"mesh": {"kind": "storage"}}}));
        let failed = dispatcher().validate_reverse_provision(&request).unwrap_err();
        assert_eq!(
            failed.problems()[0].description(),
            format!("No Specific class provided for reverse provisioning for useCaseTemplateId '{STORAGE_TEMPLATE}'")
        );
    }
}
