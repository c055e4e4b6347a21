//! # Identity Newtypes
//!
//! Newtype wrappers for the two identifiers the engine joins on. You cannot
//! pass a [`FieldKey`] where a [`ChecklistId`] is expected.
//!
//! Both validate at construction time, and deserialization routes through the
//! same constructor so that invalid values are rejected rather than silently
//! accepted.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Implement `Deserialize` for string newtypes by deserializing a plain
/// `String` and routing it through the type's `new()` constructor.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Identity of one checklist occurrence, as issued by the external store.
///
/// Opaque to the engine. Must be non-empty and free of control characters;
/// leading/trailing whitespace is rejected rather than trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChecklistId(String);

impl ChecklistId {
    /// Create a checklist identifier, validating its format.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::InvalidChecklistId {
                value: id,
                reason: "must not be empty",
            });
        }
        if id.trim() != id {
            return Err(ValidationError::InvalidChecklistId {
                value: id,
                reason: "must not have leading or trailing whitespace",
            });
        }
        if id.chars().any(char::is_control) {
            return Err(ValidationError::InvalidChecklistId {
                value: id,
                reason: "must not contain control characters",
            });
        }
        Ok(Self(id))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(ChecklistId);

impl std::fmt::Display for ChecklistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ChecklistId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Internal key of a schema field, e.g. `tasksWorked`.
///
/// Used as the map key in form state and persisted as the stable `field`
/// identifier on serialized items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    /// Create a field key. Rejects empty keys and keys containing whitespace.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.is_empty() || key.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidFieldKey(key));
        }
        Ok(Self(key))
    }

    /// Build a key from a literal known to be valid (built-in registries).
    pub(crate) fn from_static(key: &'static str) -> Self {
        debug_assert!(!key.is_empty() && !key.chars().any(char::is_whitespace));
        Self(key.to_string())
    }

    /// Access the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(FieldKey);

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for FieldKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::borrow::Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}
