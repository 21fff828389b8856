//! TAP Core
//!
//! Resolution, validation and dispatch of tech adapter requests.
//!
//! # Core Concepts
//!
//! - [`ComponentClassProvider`] / [`SpecificClassProvider`]: template id to schema resolvers
//! - [`KindDispatcher`]: turns raw requests into validated typed requests
//! - [`ComponentValidator`] / [`Provisioner`]: per-kind handlers
//! - [`TechAdapterService`]: the five operation flows
//! - [`AdapterConfig`]: YAML configuration of the resolvers
//!
//! # Example
//!
//! ```rust,ignore
//! use tap_core::prelude::*;
//!
//! let service = TechAdapterService::builder()
//!     .with_config(&AdapterConfig::from_path("tap.yaml")?)
//!     .with_validation(ValidationConfiguration::new().with_storage_validator(S3Validator))
//!     .with_provision(ProvisionConfiguration::new().with_storage_provisioner(S3Provisioner))
//!     .build();
//!
//! let status = service.provision(&ProvisioningRequest::component(descriptor))?;
//! ```

#![warn(unreachable_pub)]

mod api;
mod config;
mod dispatcher;
mod error;
mod provider;
mod provision;
mod response;
mod service;
mod validation;

pub use api::{ProvisionInfoRequest, ProvisioningRequest, ReverseProvisioningRequest, UpdateAclRequest};
pub use config::{AdapterConfig, BuiltinComponentClass};
pub use dispatcher::{kind_to_provision, parse_component_kind, KindDispatcher};
pub use error::ConfigError;
pub use provider::{
    ComponentClassProvider, ComponentClassRegistry, SpecificClassProvider, SpecificClassRegistry,
};
pub use provision::{ProvisionConfiguration, Provisioner, UnsupportedProvisioner};
pub use response::{
    ErrorMoreInfo, ProvisioningStatus, RequestValidationError, ResponseStatus,
    ReverseProvisioningStatus, SystemError, ValidationResult, SYSTEM_ERROR_USER_MESSAGE,
    VALIDATION_USER_MESSAGE,
};
pub use service::{TechAdapterService, TechAdapterServiceBuilder};
pub use validation::{
    AcceptAllValidator, ComponentValidator, UnsupportedValidator, ValidationConfiguration,
};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        AdapterConfig, ComponentClassRegistry, ComponentValidator, ProvisionConfiguration,
        ProvisioningRequest, Provisioner, ReverseProvisioningRequest, SpecificClassRegistry,
        TechAdapterService, UpdateAclRequest, ValidationConfiguration,
    };
    pub use tap_model::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
