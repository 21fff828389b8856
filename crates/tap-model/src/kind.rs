//! Closed enumerations used across the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Component kind: selects which handler serves a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Storage area
    Storage,
    /// Workload
    Workload,
    /// Output port
    #[serde(rename = "outputport")]
    OutputPort,
}

impl ComponentKind {
    /// All supported kinds
    pub const ALL: [Self; 3] = [Self::Storage, Self::Workload, Self::OutputPort];

    /// Wire string of this kind
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Workload => "workload",
            Self::OutputPort => "outputport",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind string outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported component kind '{0}'")]
pub struct UnsupportedKind(pub String);

impl FromStr for ComponentKind {
    type Err = UnsupportedKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnsupportedKind(s.to_string()))
    }
}

/// Discriminator of a provisioning request payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DescriptorKind {
    /// Whole data product, no component selected
    DataproductDescriptor,
    /// Data product plus the id of the component to provision
    ComponentDescriptor,
    /// Data product descriptor that also carries the component id
    DataproductDescriptorWithResults,
}

impl DescriptorKind {
    /// Wire string of this kind
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DataproductDescriptor => "DATAPRODUCT_DESCRIPTOR",
            Self::ComponentDescriptor => "COMPONENT_DESCRIPTOR",
            Self::DataproductDescriptorWithResults => "DATAPRODUCT_DESCRIPTOR_WITH_RESULTS",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DescriptorKind> for String {
    fn from(kind: DescriptorKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Descriptor kind string outside the known set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown descriptor kind '{0}'")]
pub struct UnknownDescriptorKind(pub String);

impl FromStr for DescriptorKind {
    type Err = UnknownDescriptorKind;

    /// Exact match on the wire string, as serde does
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::DataproductDescriptor,
            Self::ComponentDescriptor,
            Self::DataproductDescriptorWithResults,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == s)
        .ok_or_else(|| UnknownDescriptorKind(s.to_string()))
    }
}

/// Operation a request is being validated or executed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    /// Validation only
    Validate,
    /// Provision
    Provision,
    /// Unprovision
    Unprovision,
    /// Access control update
    UpdateAcl,
    /// Reverse provisioning
    ReverseProvision,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validate => "VALIDATE",
            Self::Provision => "PROVISION",
            Self::Unprovision => "UNPROVISION",
            Self::UpdateAcl => "UPDATE_ACL",
            Self::ReverseProvision => "REVERSE_PROVISION",
        };
        f.write_str(s)
    }
}
