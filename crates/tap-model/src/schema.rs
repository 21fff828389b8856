//! Schemas chosen at runtime from a component's template id
//!
//! - [`Specific`]: type-erased payload of a component's `specific` section
//!   (or of reverse provisioning `params`)
//! - [`SpecificSchema`]: named decoder producing a boxed [`Specific`]
//! - [`ComponentSchema`]: which component variant a node decodes into
//! - [`Constraints`]: declarative checks run right after decoding

use crate::error::{DecodeError, SchemaError};
use crate::kind::ComponentKind;
use crate::problem::ConstraintViolation;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Decoded, type-erased schema payload
///
/// Any serializable `'static` type is a `Specific`. Handlers recover the
/// concrete type with [`downcast_ref`](trait.Specific.html#method.downcast_ref).
pub trait Specific: Any + fmt::Debug + Send + Sync {
    /// Upcast for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Serialize back into a tree
    ///
    /// # Errors
    /// Returns error if the payload can't be represented as a tree
    fn to_tree(&self) -> Result<Value, serde_json::Error>;
}

impl<T> Specific for T
where
    T: Serialize + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_tree(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl dyn Specific {
    /// Concrete payload, if it has type `T`
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Whether the payload has type `T`
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Declarative constraints checked after a payload is decoded
pub trait Constraints {
    /// Violations found, empty when the value is valid
    fn violations(&self) -> Vec<ConstraintViolation>;
}

type DecodeFn = dyn Fn(Value) -> Result<Box<dyn Specific>, SchemaError> + Send + Sync;

/// Named decoder for a [`Specific`] payload
#[derive(Clone)]
pub struct SpecificSchema {
    name: String,
    decode: Arc<DecodeFn>,
}

impl SpecificSchema {
    /// Schema decoding into `T` with no constraint checks
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: Specific + DeserializeOwned,
    {
        Self {
            name: short_type_name::<T>(),
            decode: Arc::new(|node| {
                let value: T = serde_json::from_value(node).map_err(DecodeError::from)?;
                Ok(Box::new(value))
            }),
        }
    }

    /// Schema decoding into `T` and then checking its [`Constraints`]
    #[must_use]
    pub fn validated<T>() -> Self
    where
        T: Specific + DeserializeOwned + Constraints,
    {
        Self {
            name: short_type_name::<T>(),
            decode: Arc::new(|node| {
                let value: T = serde_json::from_value(node).map_err(DecodeError::from)?;
                let violations = value.violations();
                if violations.is_empty() {
                    Ok(Box::new(value))
                } else {
                    Err(SchemaError::Violations(violations))
                }
            }),
        }
    }

    /// Schema keeping the payload as a raw tree
    #[must_use]
    pub fn passthrough() -> Self {
        Self::of::<Value>().named("passthrough")
    }

    /// Rename the schema
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Schema name, used in logs and error messages
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decode `node` into this schema's payload type
    ///
    /// # Errors
    /// Returns [`SchemaError::Decode`] on shape mismatch and
    /// [`SchemaError::Violations`] when constraints fail
    pub fn decode(&self, node: Value) -> Result<Box<dyn Specific>, SchemaError> {
        (self.decode)(node)
    }
}

impl fmt::Debug for SpecificSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecificSchema")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// Component variant a node decodes into
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentSchema {
    /// Storage area variant, implies kind `storage`
    StorageArea,
    /// Workload variant, implies kind `workload`
    Workload,
    /// Output port variant, implies kind `outputport`
    OutputPort,
    /// Base fields only; every other field is kept as additional data
    Custom(String),
}

impl ComponentSchema {
    /// Custom schema with `name`
    #[inline]
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Schema name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::StorageArea => "StorageArea",
            Self::Workload => "Workload",
            Self::OutputPort => "OutputPort",
            Self::Custom(name) => name,
        }
    }

    /// Kind a component of this schema has when the descriptor omits it
    #[must_use]
    pub const fn implied_kind(&self) -> Option<ComponentKind> {
        match self {
            Self::StorageArea => Some(ComponentKind::Storage),
            Self::Workload => Some(ComponentKind::Workload),
            Self::OutputPort => Some(ComponentKind::OutputPort),
            Self::Custom(_) => None,
        }
    }
}

impl fmt::Display for ComponentSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Bucket {
        name: String,
    }

    impl Constraints for Bucket {
        fn violations(&self) -> Vec<ConstraintViolation> {
            if self.name.is_empty() {
                vec![ConstraintViolation::new("name", "must not be blank")]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn of_decodes_and_downcasts() {
        let schema = SpecificSchema::of::<Bucket>();
        assert_eq!(schema.name(), "Bucket");
        let specific = schema.decode(json!({"name": "b"})).unwrap();
        assert_eq!(
            specific.downcast_ref::<Bucket>(),
            Some(&Bucket { name: "b".into() })
        );
        assert!(!specific.is::<Value>());
    }

    #[test]
    fn of_rejects_wrong_shape() {
        let err = SpecificSchema::of::<Bucket>().decode(json!({"other": 1})).unwrap_err();
        assert!(matches!(err, SchemaError::Decode(DecodeError::Shape(_))));
    }

    #[test]
    fn validated_reports_violations() {
        let err = SpecificSchema::validated::<Bucket>()
            .decode(json!({"name": ""}))
            .unwrap_err();
        match err {
            SchemaError::Violations(v) => assert_eq!(v[0].to_string(), "name must not be blank"),
            SchemaError::Decode(e) => panic!("unexpected decode error {e}"),
        }
    }

    #[test]
    fn passthrough_keeps_tree() {
        let node = json!({"anything": [1, 2, 3]});
        let specific = SpecificSchema::passthrough().decode(node.clone()).unwrap();
        assert_eq!(specific.downcast_ref::<Value>(), Some(&node));
        assert_eq!(specific.to_tree().unwrap(), node);
    }

    #[test]
    fn implied_kinds() {
        assert_eq!(ComponentSchema::StorageArea.implied_kind(), Some(ComponentKind::Storage));
        assert_eq!(ComponentSchema::custom("x").implied_kind(), None);
        assert_eq!(ComponentSchema::custom("x").name(), "x");
    }
}
