//! TAP Model
//!
//! Data product model and the read side of the descriptor pipeline.
//!
//! # Core Concepts
//!
//! - [`Descriptor`] / [`DataProduct`]: parsed descriptor with raw component trees
//! - [`Component`]: typed component with a type-erased [`Specific`] payload
//! - [`ComponentSchema`] / [`SpecificSchema`]: runtime-chosen decoding targets
//! - [`FailedOperation`] / [`Problem`]: failures carried as values
//! - [`reader`]: descriptor text into trees, component lookup
//! - [`decoder`]: trees into typed components and payloads
//!
//! # Example
//!
//! ```rust,ignore
//! use tap_model::prelude::*;
//!
//! let descriptor = reader::parse_descriptor(text)?;
//! let node = descriptor
//!     .data_product
//!     .component_to_provision(&descriptor.component_id_to_provision)
//!     .unwrap();
//! let component = decoder::decode_component(
//!     node,
//!     &ComponentSchema::StorageArea,
//!     &SpecificSchema::of::<S3Specific>(),
//! )?;
//! ```

#![warn(unreachable_pub)]

mod component;
mod contract;
mod data_product;
mod error;
mod kind;
mod problem;
mod request;
mod schema;
mod status;

pub mod decoder;
pub mod reader;

pub use component::{
    Component, ComponentVariant, OutputPortFields, StorageAreaFields, WorkloadFields,
};
pub use contract::{Column, DataContract, Sla, Tag};
pub use data_product::{DataProduct, Descriptor};
pub use error::{DecodeError, SchemaError};
pub use kind::{
    ComponentKind, DescriptorKind, OperationType, UnknownDescriptorKind, UnsupportedKind,
};
pub use problem::{
    ConstraintViolation, FailedOperation, OperationResult, Problem, ProblemCause,
    PLATFORM_TEAM_SOLUTION,
};
pub use request::{
    AccessControlOperationRequest, OperationRequest, ProvisionOperationRequest,
    ReverseProvisionOperationRequest, ValidationRequest, CATALOG_KIND_PATH,
};
pub use schema::{ComponentSchema, Constraints, Specific, SpecificSchema};
pub use status::{
    Log, LogLevel, OperationStatus, ProvisionInfo, ProvisionOperationStatus,
    ReverseProvisionInfo, ReverseProvisionOperationStatus, ValidationInfo,
};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        decoder, reader, Component, ComponentKind, ComponentSchema, DataProduct, Descriptor,
        DescriptorKind, FailedOperation, OperationResult, OperationType, Problem, Specific,
        SpecificSchema, PLATFORM_TEAM_SOLUTION,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
