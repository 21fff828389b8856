//! Adapter configuration
//!
//! Declares which template ids the adapter understands and how their
//! components and payloads are decoded. Loaded once at startup and turned
//! into the two resolver registries.
//!
//! ```yaml
//! componentClasses:
//!   urn:dmb:utm:s3-storage-template:0.0.0: storage
//!   urn:dmb:utm:airflow-workload-template:0.0.0: workload
//! defaultComponentClass: custom
//! specificClasses:
//!   - urn:dmb:utm:s3-storage-template:0.0.0
//! defaultSpecificClass: false
//! reverseProvisionClasses: []
//! defaultReverseProvisionClass: false
//! ```

use crate::error::ConfigError;
use crate::provider::{ComponentClassRegistry, SpecificClassRegistry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tap_model::{ComponentSchema, SpecificSchema};

/// Builtin component schema names usable in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinComponentClass {
    /// Storage area
    Storage,
    /// Workload
    Workload,
    /// Output port
    Outputport,
    /// Base fields only
    Custom,
}

impl BuiltinComponentClass {
    /// Schema for a component of template `use_case_template_id`
    #[must_use]
    pub fn schema(self, use_case_template_id: &str) -> ComponentSchema {
        match self {
            Self::Storage => ComponentSchema::StorageArea,
            Self::Workload => ComponentSchema::Workload,
            Self::Outputport => ComponentSchema::OutputPort,
            Self::Custom => ComponentSchema::custom(use_case_template_id),
        }
    }
}

/// Template id configuration of an adapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdapterConfig {
    /// Component schema per template id
    pub component_classes: IndexMap<String, BuiltinComponentClass>,
    /// Component schema for unregistered template ids
    pub default_component_class: Option<BuiltinComponentClass>,
    /// Template ids whose `specific` section is accepted as a raw tree
    pub specific_classes: Vec<String>,
    /// Accept the `specific` section of unregistered template ids as a raw tree
    pub default_specific_class: bool,
    /// Template ids whose reverse provisioning params are accepted as a raw tree
    pub reverse_provision_classes: Vec<String>,
    /// Accept reverse provisioning params of unregistered template ids as a raw tree
    pub default_reverse_provision_class: bool,
}

impl AdapterConfig {
    /// Create empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration mapping each given template id to its builtin schema
    ///
    /// Every given id also accepts its `specific` section as a raw tree.
    #[must_use]
    pub fn default_components(
        storage_template_id: Option<&str>,
        workload_template_id: Option<&str>,
        output_port_template_id: Option<&str>,
    ) -> Self {
        let entries = [
            (storage_template_id, BuiltinComponentClass::Storage),
            (workload_template_id, BuiltinComponentClass::Workload),
            (output_port_template_id, BuiltinComponentClass::Outputport),
        ];
        let component_classes: IndexMap<String, BuiltinComponentClass> = entries
            .into_iter()
            .filter_map(|(id, class)| id.map(|id| (id.to_string(), class)))
            .collect();
        let specific_classes = component_classes.keys().cloned().collect();
        Self {
            component_classes,
            specific_classes,
            ..Self::default()
        }
    }

    /// Parse YAML (or JSON) configuration text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] when the text is not a valid configuration
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load configuration from a file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file can't be read and
    /// [`ConfigError::Parse`] when its content is not a valid configuration
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(
            "Loaded configuration from {} with {} component classes",
            path.display(),
            config.component_classes.len()
        );
        Ok(config)
    }

    /// Component schema registry described by this configuration
    #[must_use]
    pub fn component_registry(&self) -> ComponentClassRegistry {
        let registry = self
            .component_classes
            .iter()
            .fold(ComponentClassRegistry::new(), |registry, (id, class)| {
                registry.with_class(id.clone(), class.schema(id))
            });
        match self.default_component_class {
            Some(class) => registry.with_default_class(class.schema("default")),
            None => registry,
        }
    }

    /// Payload schema registry described by this configuration
    #[must_use]
    pub fn specific_registry(&self) -> SpecificClassRegistry {
        let mut registry = SpecificClassRegistry::new();
        for id in &self.specific_classes {
            registry = registry.with_specific(id.clone(), SpecificSchema::passthrough());
        }
        for id in &self.reverse_provision_classes {
            registry = registry.with_reverse_provision_params(id.clone(), SpecificSchema::passthrough());
        }
        if self.default_specific_class {
            registry = registry.with_default_specific(SpecificSchema::passthrough());
        }
        if self.default_reverse_provision_class {
            registry = registry.with_default_reverse_provision_params(SpecificSchema::passthrough());
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ComponentClassProvider, SpecificClassProvider};
    use std::io::Write;

    const CONFIG: &str = r"
componentClasses:
  urn:dmb:utm:s3-storage-template:0.0.0: storage
  urn:dmb:utm:custom-template:0.0.0: custom
defaultComponentClass: workload
specificClasses:
  - urn:dmb:utm:s3-storage-template:0.0.0
reverseProvisionClasses:
  - urn:dmb:utm:s3-storage-template:0.0.0
";

    #[test]
    fn parses_yaml() {
        let config = AdapterConfig::from_yaml_str(CONFIG).unwrap();
        assert_eq!(config.component_classes.len(), 2);
        assert_eq!(config.default_component_class, Some(BuiltinComponentClass::Workload));
        assert!(!config.default_specific_class);
    }

    #[test]
    fn builds_registries() {
        let config = AdapterConfig::from_yaml_str(CONFIG).unwrap();
        let components = config.component_registry();
        assert_eq!(
            components.resolve("urn:dmb:utm:s3-storage-template:0.0.0"),
            Some(ComponentSchema::StorageArea)
        );
        assert_eq!(
            components.resolve("urn:dmb:utm:custom-template:0.0.0"),
            Some(ComponentSchema::custom("urn:dmb:utm:custom-template:0.0.0"))
        );
        assert_eq!(components.resolve("urn:other"), Some(ComponentSchema::Workload));

        let specifics = config.specific_registry();
        assert!(specifics.resolve("urn:dmb:utm:s3-storage-template:0.0.0").is_some());
        assert!(specifics.resolve("urn:other").is_none());
        assert!(specifics
            .resolve_reverse_params("urn:dmb:utm:s3-storage-template:0.0.0")
            .is_some());
    }

    #[test]
    fn default_components_register_specifics() {
        let config = AdapterConfig::default_components(Some("urn:s3"), None, Some("urn:view"));
        assert_eq!(config.specific_classes, vec!["urn:s3", "urn:view"]);
        assert_eq!(
            config.component_registry().resolve("urn:view"),
            Some(ComponentSchema::OutputPort)
        );
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();
        let config = AdapterConfig::from_path(file.path()).unwrap();
        assert_eq!(config.reverse_provision_classes.len(), 1);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AdapterConfig::from_path("/nonexistent/tap.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/tap.yaml"));
    }

    #[test]
    fn unknown_class_is_rejected() {
        let err = AdapterConfig::from_yaml_str("componentClasses: {x: bucket}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
