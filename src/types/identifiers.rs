use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Lower-cased comparison key for an identifier.
fn normalize_key(raw: &str) -> String {
    raw.to_lowercase()
}

macro_rules! case_insensitive_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name {
            raw: String,
            key: String,
        }

        impl $name {
            pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
                let raw = raw.into();
                if raw.is_empty() {
                    return Err(ValidationError::EmptyIdentifier { field: $field });
                }
                let key = normalize_key(&raw);
                Ok(Self { raw, key })
            }

            /// The identifier exactly as it was supplied.
            pub fn as_str(&self) -> &str {
                &self.raw
            }

            /// The lower-cased key used for equality, hashing and ordering.
            pub fn key(&self) -> &str {
                &self.key
            }

            /// Compares against a plain string under the same case-insensitive rule.
            pub fn matches(&self, other: &str) -> bool {
                self.key == normalize_key(other)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.key == other.key
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.key.hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.key.cmp(&other.key)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.raw)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValidationError;

            fn try_from(raw: &str) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.raw
            }
        }
    };
}

case_insensitive_id!(
    /// Story identifier. Two ids differing only in case are the same story.
    StoryId,
    "id"
);

case_insensitive_id!(
    /// Category identifier. Compared case-insensitively, displayed as supplied.
    CategoryId,
    "category"
);
