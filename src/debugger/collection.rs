//! Tensor collection configuration.

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// A named group of tensors with shared save/filter parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    #[serde(rename = "CollectionName", default)]
    pub name: Option<String>,

    #[serde(
        rename = "CollectionParameters",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parameters: Option<HashMap<String, String>>,
}

impl CollectionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            parameters: None,
        }
    }

    pub fn with_parameters(name: impl Into<String>, parameters: HashMap<String, String>) -> Self {
        Self {
            name: Some(name.into()),
            parameters: Some(parameters),
        }
    }

    /// Request fragment: `CollectionName` (null when unnamed) plus
    /// `CollectionParameters` when set.
    pub fn to_request_dict(&self) -> serde_json::Value {
        // Serializing plain strings and string maps cannot fail
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Compare against a value whose type is only known at runtime.
    ///
    /// Anything other than a `CollectionConfig` is a `TypeMismatch`.
    pub fn checked_eq(&self, other: &dyn Any) -> Result<bool, RuleError> {
        match other.downcast_ref::<CollectionConfig>() {
            Some(other) => Ok(self == other),
            None => Err(RuleError::TypeMismatch(
                "CollectionConfig is only comparable with CollectionConfig".to_string(),
            )),
        }
    }

    pub fn checked_ne(&self, other: &dyn Any) -> Result<bool, RuleError> {
        self.checked_eq(other).map(|equal| !equal)
    }

    fn sorted_parameters(&self) -> Vec<(&String, &String)> {
        let mut items: Vec<_> = self
            .parameters
            .iter()
            .flat_map(|parameters| parameters.iter())
            .collect();
        items.sort();
        items
    }
}

impl Hash for CollectionConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.sorted_parameters().hash(state);
    }
}
