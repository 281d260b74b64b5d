//! Tracking configuration.
//!
//! Declares which types participate in tracking, which of their properties
//! are tracked, and per-property policy (item-level tracking of contained
//! values, scalar equality rule). Built in code through the builder or
//! loaded declaratively from TOML; either way the configuration is
//! validated against a [`Schema`] before it can be used to wrap anything.

use crate::error::ConfigError;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// How a scalar-fallback property decides a newly installed value differs
/// from the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarEquality {
    /// Structural value equality (default).
    #[default]
    Structural,
    /// Pointer identity for object-valued scalars; other values fall back
    /// to structural comparison.
    Identity,
}

/// Per-property tracking policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyConfig {
    /// Wrap contained objects of tracked types into tracked views.
    #[serde(default = "default_true")]
    pub track_items: bool,

    /// Equality rule for scalar-fallback tracking.
    #[serde(default)]
    pub scalar_equality: ScalarEquality,
}

fn default_true() -> bool {
    true
}

impl Default for PropertyConfig {
    fn default() -> Self {
        PropertyConfig {
            track_items: true,
            scalar_equality: ScalarEquality::default(),
        }
    }
}

/// Tracking declaration for one type. An empty property map tracks every
/// property the schema declares for the type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeConfig {
    #[serde(default)]
    properties: BTreeMap<String, PropertyConfig>,
}

impl TypeConfig {
    /// Includes a property with default policy.
    pub fn include(&mut self, property: impl Into<String>) -> &mut Self {
        self.properties.entry(property.into()).or_default();
        self
    }

    /// Includes a property with an explicit policy.
    pub fn include_with(
        &mut self,
        property: impl Into<String>,
        config: PropertyConfig,
    ) -> &mut Self {
        self.properties.insert(property.into(), config);
        self
    }

    fn tracks_property(&self, property: &str) -> bool {
        self.properties.is_empty() || self.properties.contains_key(property)
    }
}

/// Validated tracking configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingConfig {
    #[serde(default)]
    types: BTreeMap<String, TypeConfig>,
}

impl TrackingConfig {
    pub fn builder() -> TrackingConfigBuilder {
        TrackingConfigBuilder {
            types: BTreeMap::new(),
        }
    }

    /// Parses a TOML document and validates it against the schema.
    pub fn from_toml_str(document: &str, schema: &Schema) -> Result<Self, ConfigError> {
        let config: TrackingConfig = toml::from_str(document)?;
        config.validate(schema)?;
        Ok(config)
    }

    /// Loads and validates a TOML configuration file.
    pub fn load_from_file(path: &Path, schema: &Schema) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&document, schema)?;
        debug!(path = %path.display(), "loaded tracking configuration");
        Ok(config)
    }

    /// Checks every type/property reference against the schema.
    pub fn validate(&self, schema: &Schema) -> Result<(), ConfigError> {
        for (type_name, type_config) in &self.types {
            if !schema.has_type(type_name) {
                return Err(ConfigError::UnknownType(type_name.clone()));
            }
            for property in type_config.properties.keys() {
                if !schema.has_property(type_name, property) {
                    return Err(ConfigError::UnknownProperty {
                        type_name: type_name.clone(),
                        property: property.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether instances of `type_name` participate in tracking at all.
    pub fn is_tracked_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Whether `property` on `type_name` is tracked.
    pub fn is_tracked_property(&self, type_name: &str, property: &str) -> bool {
        self.types
            .get(type_name)
            .map(|type_config| type_config.tracks_property(property))
            .unwrap_or(false)
    }

    /// Policy for a property; defaults apply when the property is tracked
    /// implicitly (empty include list).
    pub fn property_config(&self, type_name: &str, property: &str) -> PropertyConfig {
        self.types
            .get(type_name)
            .and_then(|type_config| type_config.properties.get(property))
            .cloned()
            .unwrap_or_default()
    }
}

/// Builder collecting type declarations before schema validation.
pub struct TrackingConfigBuilder {
    types: BTreeMap<String, TypeConfig>,
}

impl TrackingConfigBuilder {
    /// Declares a type as tracked and returns its configuration for
    /// property includes. Declaring with no includes tracks every declared
    /// property of the type.
    pub fn track_type(&mut self, type_name: impl Into<String>) -> &mut TypeConfig {
        self.types.entry(type_name.into()).or_default()
    }

    /// Validates against the schema and produces the configuration.
    pub fn build(self, schema: &Schema) -> Result<TrackingConfig, ConfigError> {
        let config = TrackingConfig { types: self.types };
        config.validate(schema)?;
        Ok(config)
    }
}
