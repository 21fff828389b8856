//! Per-kind component validation
//!
//! A [`ComponentValidator`] checks a typed request before any handler runs.
//! [`ValidationConfiguration`] holds one validator per [`ComponentKind`];
//! kinds without a registered validator reject every request.

use std::fmt;
use std::sync::Arc;
use tap_model::{
    ComponentKind, FailedOperation, OperationResult, OperationType, Problem, ValidationRequest,
    PLATFORM_TEAM_SOLUTION,
};

const VALIDATION_SETUP_SOLUTION: &str = "Ensure that the adapter is registered correctly for this type of request and that the ValidationConfiguration is set up to support the requested component";

/// Validates a typed request for one component kind
pub trait ComponentValidator: Send + Sync {
    /// Accept or reject `request` for `operation`
    ///
    /// # Errors
    /// Returns the failure describing why the request is rejected
    fn validate(&self, request: ValidationRequest<'_>, operation: OperationType) -> OperationResult<()> {
        let _ = (request, operation);
        Err(FailedOperation::single(
            "Validation for the operation request not supported",
            Problem::new("This adapter doesn't support validation for the received request")
                .with_solutions([VALIDATION_SETUP_SOLUTION, PLATFORM_TEAM_SOLUTION]),
        ))
    }
}

/// Validator rejecting every request as unsupported
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedValidator;

impl ComponentValidator for UnsupportedValidator {}

/// Validator accepting every request
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllValidator;

impl ComponentValidator for AcceptAllValidator {
    fn validate(&self, _request: ValidationRequest<'_>, _operation: OperationType) -> OperationResult<()> {
        Ok(())
    }
}

/// One validator per component kind
#[derive(Clone)]
pub struct ValidationConfiguration {
    storage: Arc<dyn ComponentValidator>,
    workload: Arc<dyn ComponentValidator>,
    output_port: Arc<dyn ComponentValidator>,
}

impl ValidationConfiguration {
    /// Configuration rejecting every kind
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage validator
    #[must_use]
    pub fn with_storage_validator(mut self, validator: impl ComponentValidator + 'static) -> Self {
        self.storage = Arc::new(validator);
        self
    }

    /// Set the workload validator
    #[must_use]
    pub fn with_workload_validator(mut self, validator: impl ComponentValidator + 'static) -> Self {
        self.workload = Arc::new(validator);
        self
    }

    /// Set the output port validator
    #[must_use]
    pub fn with_output_port_validator(mut self, validator: impl ComponentValidator + 'static) -> Self {
        self.output_port = Arc::new(validator);
        self
    }

    /// Set the validator for `kind` from a shared handle
    #[must_use]
    pub fn with_shared_validator(mut self, kind: ComponentKind, validator: Arc<dyn ComponentValidator>) -> Self {
        match kind {
            ComponentKind::Storage => self.storage = validator,
            ComponentKind::Workload => self.workload = validator,
            ComponentKind::OutputPort => self.output_port = validator,
        }
        self
    }

    /// Validator serving `kind`
    #[must_use]
    pub fn validator(&self, kind: ComponentKind) -> &dyn ComponentValidator {
        match kind {
            ComponentKind::Storage => self.storage.as_ref(),
            ComponentKind::Workload => self.workload.as_ref(),
            ComponentKind::OutputPort => self.output_port.as_ref(),
        }
    }
}

impl Default for ValidationConfiguration {
    fn default() -> Self {
        Self {
            storage: Arc::new(UnsupportedValidator),
            workload: Arc::new(UnsupportedValidator),
            output_port: Arc::new(UnsupportedValidator),
        }
    }
}

impl fmt::Debug for ValidationConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationConfiguration").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tap_model::{DataProduct, OperationRequest, ProvisionOperationRequest};

    fn request() -> ProvisionOperationRequest {
        ProvisionOperationRequest::new(OperationRequest::new(DataProduct::default(), None), false)
    }

    #[test]
    fn default_validator_is_unsupported() {
        let config = ValidationConfiguration::new();
        let request = request();
        let failed = config
            .validator(ComponentKind::Workload)
            .validate(ValidationRequest::Provision(&request), OperationType::Validate)
            .unwrap_err();
        assert_eq!(failed.message(), "Validation for the operation request not supported");
        let solutions = failed.problems()[0].solutions();
        assert!(solutions.contains(PLATFORM_TEAM_SOLUTION));
        assert_eq!(solutions.len(), 2);
    }

    #[test]
    fn registered_validator_serves_its_kind_only() {
        let config = ValidationConfiguration::new().with_storage_validator(AcceptAllValidator);
        let request = request();
        let validation = ValidationRequest::Provision(&request);
        assert!(config
            .validator(ComponentKind::Storage)
            .validate(validation, OperationType::Provision)
            .is_ok());
        assert!(config
            .validator(ComponentKind::OutputPort)
            .validate(validation, OperationType::Provision)
            .is_err());
    }
}
