//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A date range whose end precedes its start.
    #[error("range end {end} is before start {start}")]
    InvertedRange { start: String, end: String },

    /// A month outside 1..=12 or a year chrono cannot represent.
    #[error("invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    /// Unknown achievement category name.
    #[error("unknown achievement category: {value}")]
    UnknownCategory { value: String },

    /// Unknown record domain name.
    #[error("unknown domain: {value}")]
    UnknownDomain { value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// The user every record, habit and progress row belongs to.
    ///
    /// All operations in this crate are scoped to exactly one owner.
    OwnerId, "owner ID"
);

define_string_id!(
    /// A record identifier, unique within its domain.
    RecordId, "record ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_rejects_empty() {
        assert!(OwnerId::new("").is_err());
        assert!(OwnerId::new("   ").is_err());
        assert!(OwnerId::new("user-1").is_ok());
    }

    #[test]
    fn record_id_serde_roundtrip() {
        let id = RecordId::new("task-42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"task-42\"");
        let parsed: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn record_id_serde_rejects_empty() {
        let result: Result<RecordId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn owner_id_as_ref() {
        let id = OwnerId::new("alice").unwrap();
        let s: &str = id.as_ref();
        assert_eq!(s, "alice");
        assert_eq!(id.to_string(), "alice");
    }

    #[test]
    fn validation_error_messages() {
        let err = ValidationError::InvertedRange {
            start: "2024-06-05".into(),
            end: "2024-06-01".into(),
        };
        assert_eq!(
            err.to_string(),
            "range end 2024-06-01 is before start 2024-06-05"
        );
        assert_eq!(
            ValidationError::Empty { field: "owner ID" }.to_string(),
            "owner ID cannot be empty"
        );
    }
}
