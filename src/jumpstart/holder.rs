//! Structural identity shared by every JumpStart data holder.
//!
//! A holder declares an ordered, closed list of attribute names. Equality,
//! hashing and string conversion are derived from the attribute values in
//! that order, so two holders of the same type are equal exactly when every
//! declared attribute is equal. Holders of different types never compare
//! equal.

use crate::error::CatalogError;
use serde_json::{Map, Value};
use std::any::{Any, TypeId};
use std::hash::{Hash, Hasher};

/// A catalog record with a fixed set of named attributes.
pub trait JumpStartDataHolder: Sized + 'static {
    const TYPE_NAME: &'static str;

    /// Declared attribute names, in order.
    const FIELDS: &'static [&'static str];

    /// Build from a raw JSON mapping, failing on the first missing required key.
    fn from_json(json: &Value) -> Result<Self, CatalogError>;

    /// Inverse of [`JumpStartDataHolder::from_json`].
    fn to_json(&self) -> Map<String, Value>;
}

/// Attribute values in declaration order; undeclared keys are ignored.
pub fn attribute_values<T: JumpStartDataHolder>(holder: &T) -> Vec<Value> {
    let json = holder.to_json();
    T::FIELDS
        .iter()
        .map(|field| json.get(*field).cloned().unwrap_or(Value::Null))
        .collect()
}

pub fn holder_eq<T: JumpStartDataHolder>(left: &T, right: &T) -> bool {
    attribute_values(left) == attribute_values(right)
}

/// Equality against a value whose type is only known at runtime.
pub fn holder_eq_any<T: JumpStartDataHolder>(left: &T, right: &dyn Any) -> bool {
    right
        .downcast_ref::<T>()
        .is_some_and(|right| holder_eq(left, right))
}

/// Hash the concrete type followed by every attribute value.
pub fn holder_hash<T: JumpStartDataHolder, H: Hasher>(holder: &T, state: &mut H) {
    TypeId::of::<T>().hash(state);
    for value in attribute_values(holder) {
        // Object keys serialize sorted, so equal values render identically
        value.to_string().hash(state);
    }
}

/// `"<TypeName>: {<attributes>}"`
pub fn holder_to_string<T: JumpStartDataHolder>(holder: &T) -> String {
    let attributes: Map<String, Value> = T::FIELDS
        .iter()
        .map(|field| field.to_string())
        .zip(attribute_values(holder))
        .collect();
    format!("{}: {}", T::TYPE_NAME, Value::Object(attributes))
}

/// Implement `PartialEq`, `Eq`, `Hash` and `Display` through the holder functions.
macro_rules! impl_structural_identity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    $crate::jumpstart::holder::holder_eq(self, other)
                }
            }

            impl Eq for $ty {}

            impl std::hash::Hash for $ty {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    $crate::jumpstart::holder::holder_hash(self, state)
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&$crate::jumpstart::holder::holder_to_string(self))
                }
            }
        )+
    };
}

pub(crate) use impl_structural_identity;

pub(crate) fn as_object<'a>(
    type_name: &'static str,
    json: &'a Value,
) -> Result<&'a Map<String, Value>, CatalogError> {
    json.as_object().ok_or_else(|| CatalogError::InvalidField {
        type_name,
        field: "<root>".to_string(),
        message: "expected a JSON object".to_string(),
    })
}

pub(crate) fn required<'a>(
    type_name: &'static str,
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Value, CatalogError> {
    object.get(field).ok_or_else(|| CatalogError::MissingField {
        type_name,
        field: field.to_string(),
    })
}

fn invalid(type_name: &'static str, field: &str, expected: &str) -> CatalogError {
    CatalogError::InvalidField {
        type_name,
        field: field.to_string(),
        message: format!("expected {}", expected),
    }
}

pub(crate) fn required_str(
    type_name: &'static str,
    object: &Map<String, Value>,
    field: &str,
) -> Result<String, CatalogError> {
    required(type_name, object, field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(type_name, field, "a string"))
}

pub(crate) fn required_bool(
    type_name: &'static str,
    object: &Map<String, Value>,
    field: &str,
) -> Result<bool, CatalogError> {
    required(type_name, object, field)?
        .as_bool()
        .ok_or_else(|| invalid(type_name, field, "a boolean"))
}

/// A key that may be missing or `null`.
pub(crate) fn optional_str(
    type_name: &'static str,
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, CatalogError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(invalid(type_name, field, "a string or null")),
    }
}

pub(crate) fn optional_object(
    type_name: &'static str,
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<Map<String, Value>>, CatalogError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(value)) => Ok(Some(value.clone())),
        Some(_) => Err(invalid(type_name, field, "an object or null")),
    }
}
