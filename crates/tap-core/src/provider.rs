//! Template id resolvers
//!
//! - [`ComponentClassProvider`]: template id to [`ComponentSchema`]
//! - [`SpecificClassProvider`]: template id to [`SpecificSchema`] for the
//!   `specific` section and for reverse provisioning `params`
//!
//! The registries are populated once while the adapter is assembled and are
//! read-only afterwards; lookups fall back to the configured defaults.

use std::collections::HashMap;
use tap_model::{ComponentSchema, SpecificSchema};

/// Resolves the component schema for a template id
#[cfg_attr(test, mockall::automock)]
pub trait ComponentClassProvider: Send + Sync {
    /// Schema for `use_case_template_id`, or `None` when unsupported
    fn resolve(&self, use_case_template_id: &str) -> Option<ComponentSchema>;
}

/// Resolves payload schemas for a template id
#[cfg_attr(test, mockall::automock)]
pub trait SpecificClassProvider: Send + Sync {
    /// Schema of the `specific` section
    fn resolve(&self, use_case_template_id: &str) -> Option<SpecificSchema>;

    /// Schema of reverse provisioning `params`
    fn resolve_reverse_params(&self, use_case_template_id: &str) -> Option<SpecificSchema> {
        let _ = use_case_template_id;
        None
    }
}

/// Map-backed [`ComponentClassProvider`]
#[derive(Debug, Clone, Default)]
pub struct ComponentClassRegistry {
    classes: HashMap<String, ComponentSchema>,
    default_class: Option<ComponentSchema>,
}

impl ComponentClassRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry mapping each given template id to its builtin schema
    #[must_use]
    pub fn default_components(
        storage_template_id: Option<&str>,
        workload_template_id: Option<&str>,
        output_port_template_id: Option<&str>,
    ) -> Self {
        [
            (storage_template_id, ComponentSchema::StorageArea),
            (workload_template_id, ComponentSchema::Workload),
            (output_port_template_id, ComponentSchema::OutputPort),
        ]
        .into_iter()
        .filter_map(|(id, schema)| id.map(|id| (id, schema)))
        .fold(Self::new(), |registry, (id, schema)| registry.with_class(id, schema))
    }

    /// Register `schema` for `use_case_template_id`
    #[must_use]
    pub fn with_class(mut self, use_case_template_id: impl Into<String>, schema: ComponentSchema) -> Self {
        self.classes.insert(use_case_template_id.into(), schema);
        self
    }

    /// Schema returned for unregistered template ids
    #[must_use]
    pub fn with_default_class(mut self, schema: ComponentSchema) -> Self {
        self.default_class = Some(schema);
        self
    }

    /// Number of registered template ids
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no template id is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ComponentClassProvider for ComponentClassRegistry {
    fn resolve(&self, use_case_template_id: &str) -> Option<ComponentSchema> {
        self.classes
            .get(use_case_template_id)
            .or(self.default_class.as_ref())
            .cloned()
    }
}

/// Map-backed [`SpecificClassProvider`]
#[derive(Debug, Clone, Default)]
pub struct SpecificClassRegistry {
    specific: HashMap<String, SpecificSchema>,
    default_specific: Option<SpecificSchema>,
    reverse_params: HashMap<String, SpecificSchema>,
    default_reverse_params: Option<SpecificSchema>,
}

impl SpecificClassRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` for the `specific` section of `use_case_template_id`
    #[must_use]
    pub fn with_specific(mut self, use_case_template_id: impl Into<String>, schema: SpecificSchema) -> Self {
        self.specific.insert(use_case_template_id.into(), schema);
        self
    }

    /// `specific` schema returned for unregistered template ids
    #[must_use]
    pub fn with_default_specific(mut self, schema: SpecificSchema) -> Self {
        self.default_specific = Some(schema);
        self
    }

    /// Register `schema` for reverse provisioning params of `use_case_template_id`
    #[must_use]
    pub fn with_reverse_provision_params(
        mut self,
        use_case_template_id: impl Into<String>,
        schema: SpecificSchema,
    ) -> Self {
        self.reverse_params.insert(use_case_template_id.into(), schema);
        self
    }

    /// Params schema returned for unregistered template ids
    #[must_use]
    pub fn with_default_reverse_provision_params(mut self, schema: SpecificSchema) -> Self {
        self.default_reverse_params = Some(schema);
        self
    }
}

impl SpecificClassProvider for SpecificClassRegistry {
    fn resolve(&self, use_case_template_id: &str) -> Option<SpecificSchema> {
        self.specific
            .get(use_case_template_id)
            .or(self.default_specific.as_ref())
            .cloned()
    }

    fn resolve_reverse_params(&self, use_case_template_id: &str) -> Option<SpecificSchema> {
        self.reverse_params
            .get(use_case_template_id)
            .or(self.default_reverse_params.as_ref())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_components_skip_absent_ids() {
        let registry = ComponentClassRegistry::default_components(Some("urn:s3"), None, Some("urn:view"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("urn:s3"), Some(ComponentSchema::StorageArea));
        assert_eq!(registry.resolve("urn:view"), Some(ComponentSchema::OutputPort));
        assert_eq!(registry.resolve("urn:job"), None);
    }

    #[test]
    fn specific_and_params_are_separate() {
        let registry = SpecificClassRegistry::new()
            .with_specific("urn:s3", SpecificSchema::passthrough().named("S3"))
            .with_reverse_provision_params("urn:s3", SpecificSchema::passthrough().named("S3Params"));
        assert_eq!(registry.resolve("urn:s3").map(|s| s.name().to_string()).as_deref(), Some("S3"));
        assert_eq!(
            registry
                .resolve_reverse_params("urn:s3")
                .map(|s| s.name().to_string())
                .as_deref(),
            Some("S3Params")
        );
        assert!(registry.resolve("urn:other").is_none());
        assert!(registry.resolve_reverse_params("urn:other").is_none());
    }

    #[test]
    fn mocked_provider_answers_calls() {
        let mut provider = MockSpecificClassProvider::new();
        provider
            .expect_resolve()
            .times(1)
            .returning(|_| Some(SpecificSchema::passthrough()));
        assert!(provider.resolve("urn:s3").is_some());
    }

    proptest! {
        #[test]
        fn unregistered_ids_fall_back_to_default(id in "urn:[a-z]{1,10}:[0-9]{1,3}") {
            let registry = ComponentClassRegistry::new()
                .with_class("urn:registered:0", ComponentSchema::Workload)
                .with_default_class(ComponentSchema::custom("Fallback"));
            let expected = if id == "urn:registered:0" {
                ComponentSchema::Workload
            } else {
                ComponentSchema::custom("Fallback")
            };
            prop_assert_eq!(registry.resolve(&id), Some(expected));

            let specific = SpecificClassRegistry::new()
                .with_default_specific(SpecificSchema::passthrough().named("fallback"));
            prop_assert_eq!(
                specific.resolve(&id).map(|s| s.name().to_string()),
                Some("fallback".to_string())
            );
        }
    }
}
