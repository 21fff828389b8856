//! Typed operation requests handed to validators and provisioners

use crate::component::Component;
use crate::data_product::DataProduct;
use crate::problem::{FailedOperation, OperationResult, Problem};
use crate::schema::Specific;
use serde_json::Value;
use std::collections::BTreeSet;

/// Path of the component kind inside reverse provisioning catalog info
pub const CATALOG_KIND_PATH: &str = "spec.mesh.kind";

/// Data product with the typed component being operated on
#[derive(Debug)]
pub struct OperationRequest {
    data_product: DataProduct,
    component: Option<Component>,
}

impl OperationRequest {
    /// Create request
    #[inline]
    #[must_use]
    pub fn new(data_product: DataProduct, component: Option<Component>) -> Self {
        Self {
            data_product,
            component,
        }
    }

    /// Data product
    #[inline]
    #[must_use]
    pub fn data_product(&self) -> &DataProduct {
        &self.data_product
    }

    /// Typed component, absent for data product level requests
    #[inline]
    #[must_use]
    pub fn component(&self) -> Option<&Component> {
        self.component.as_ref()
    }

    /// Kind string of the component to provision
    ///
    /// # Errors
    /// Returns a failure when there is no component or its kind is empty
    pub fn component_kind_to_provision(&self) -> OperationResult<&str> {
        let Some(component) = &self.component else {
            return Err(FailedOperation::simple(
                "Error while processing the input descriptor. Component to provision is empty or malformed",
            )
            .with_input_error_field("dataProduct.components"));
        };
        if component.kind.trim().is_empty() {
            let problem = format!(
                "Couldn't retrieve 'kind' field for the component with ID '{}'",
                component.id
            );
            return Err(FailedOperation::single(
                "Error while processing the input descriptor. Component to provision is empty or malformed",
                Problem::new(problem),
            )
            .with_input_error_field(format!(
                "dataProduct.components.[(@.id == '{}')].kind",
                component.id
            )));
        }
        Ok(&component.kind)
    }
}

/// Request for provision, unprovision and validation
#[derive(Debug)]
pub struct ProvisionOperationRequest {
    request: OperationRequest,
    remove_data: bool,
    latest_enriched_descriptor: Option<Value>,
}

impl ProvisionOperationRequest {
    /// Create request
    #[inline]
    #[must_use]
    pub fn new(request: OperationRequest, remove_data: bool) -> Self {
        Self {
            request,
            remove_data,
            latest_enriched_descriptor: None,
        }
    }

    /// Attach the last descriptor enriched by the platform
    #[must_use]
    pub fn with_latest_enriched_descriptor(mut self, descriptor: Option<Value>) -> Self {
        self.latest_enriched_descriptor = descriptor;
        self
    }

    /// Data product plus component
    #[inline]
    #[must_use]
    pub fn operation_request(&self) -> &OperationRequest {
        &self.request
    }

    /// Data product
    #[inline]
    #[must_use]
    pub fn data_product(&self) -> &DataProduct {
        self.request.data_product()
    }

    /// Typed component
    #[inline]
    #[must_use]
    pub fn component(&self) -> Option<&Component> {
        self.request.component()
    }

    /// Whether unprovisioning should also remove data
    #[inline]
    #[must_use]
    pub fn remove_data(&self) -> bool {
        self.remove_data
    }

    /// Last enriched descriptor as a tree
    #[inline]
    #[must_use]
    pub fn latest_enriched_descriptor(&self) -> Option<&Value> {
        self.latest_enriched_descriptor.as_ref()
    }
}

/// Request for an access control update
#[derive(Debug)]
pub struct AccessControlOperationRequest {
    request: OperationRequest,
    refs: BTreeSet<String>,
}

impl AccessControlOperationRequest {
    /// Create request granting access to `refs`
    #[must_use]
    pub fn new(request: OperationRequest, refs: impl IntoIterator<Item = String>) -> Self {
        Self {
            request,
            refs: refs.into_iter().collect(),
        }
    }

    /// Data product plus component
    #[inline]
    #[must_use]
    pub fn operation_request(&self) -> &OperationRequest {
        &self.request
    }

    /// Data product
    #[inline]
    #[must_use]
    pub fn data_product(&self) -> &DataProduct {
        self.request.data_product()
    }

    /// Typed component
    #[inline]
    #[must_use]
    pub fn component(&self) -> Option<&Component> {
        self.request.component()
    }

    /// Identities to grant access to, deduplicated and sorted
    #[inline]
    #[must_use]
    pub fn refs(&self) -> &BTreeSet<String> {
        &self.refs
    }
}

/// Request for reverse provisioning
#[derive(Debug)]
pub struct ReverseProvisionOperationRequest {
    use_case_template_id: String,
    environment: String,
    params: Box<dyn Specific>,
    catalog_info: Value,
}

impl ReverseProvisionOperationRequest {
    /// Create request
    #[must_use]
    pub fn new(
        use_case_template_id: impl Into<String>,
        environment: impl Into<String>,
        params: Box<dyn Specific>,
        catalog_info: Value,
    ) -> Self {
        Self {
            use_case_template_id: use_case_template_id.into(),
            environment: environment.into(),
            params,
            catalog_info,
        }
    }

    /// Template id of the component being imported
    #[inline]
    #[must_use]
    pub fn use_case_template_id(&self) -> &str {
        &self.use_case_template_id
    }

    /// Target environment
    #[inline]
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Decoded params
    #[inline]
    #[must_use]
    pub fn params(&self) -> &dyn Specific {
        &*self.params
    }

    /// Concrete params, if they have type `T`
    #[must_use]
    pub fn params_as<T: 'static>(&self) -> Option<&T> {
        self.params.downcast_ref::<T>()
    }

    /// Catalog info tree
    #[inline]
    #[must_use]
    pub fn catalog_info(&self) -> &Value {
        &self.catalog_info
    }

    /// Component kind read from `spec.mesh.kind` of the catalog info
    ///
    /// # Errors
    /// Returns a failure carrying the catalog info and the field path when
    /// the kind is missing or empty
    pub fn component_kind(&self) -> OperationResult<&str> {
        self.catalog_info
            .pointer("/spec/mesh/kind")
            .and_then(Value::as_str)
            .filter(|kind| !kind.trim().is_empty())
            .ok_or_else(|| {
                FailedOperation::single(
                    "Error while extracting the component kind from the Reverse Provision input catalog info",
                    Problem::new("Couldn't retrieve 'kind' field for the component catalog info"),
                )
                .with_input(self.catalog_info.to_string())
                .with_input_error_field(CATALOG_KIND_PATH)
            })
    }
}

/// Request handed to a validator
#[derive(Debug, Clone, Copy)]
pub enum ValidationRequest<'a> {
    /// Provision, unprovision or plain validation
    Provision(&'a ProvisionOperationRequest),
    /// Access control update
    AccessControl(&'a AccessControlOperationRequest),
}

impl<'a> ValidationRequest<'a> {
    /// Data product plus component
    #[must_use]
    pub fn operation_request(&self) -> &'a OperationRequest {
        match *self {
            Self::Provision(r) => r.operation_request(),
            Self::AccessControl(r) => r.operation_request(),
        }
    }

    /// Typed component
    #[must_use]
    pub fn component(&self) -> Option<&'a Component> {
        self.operation_request().component()
    }

    /// Provision request, if this is one
    #[must_use]
    pub fn as_provision(&self) -> Option<&'a ProvisionOperationRequest> {
        match *self {
            Self::Provision(r) => Some(r),
            Self::AccessControl(_) => None,
        }
    }

    /// Access control request, if this is one
    #[must_use]
    pub fn as_access_control(&self) -> Option<&'a AccessControlOperationRequest> {
        match *self {
            Self::AccessControl(r) => Some(r),
            Self::Provision(_) => None,
        }
    }
}
