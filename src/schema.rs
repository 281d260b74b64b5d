//! Declared type schemas used to validate tracking configuration.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Declared types and their property names.
///
/// The tracking configuration is resolved against a schema before any wrap
/// call, so a configuration referencing an unknown type or property fails at
/// configuration time, never during mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    types: BTreeMap<String, BTreeSet<String>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a type and its property names, builder style.
    pub fn with_type<I, S>(mut self, type_name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.insert(
            type_name.into(),
            properties.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn has_property(&self, type_name: &str, property: &str) -> bool {
        self.types
            .get(type_name)
            .map(|properties| properties.contains(property))
            .unwrap_or(false)
    }
}
