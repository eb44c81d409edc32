//! Validated primitives shared by the ledger model and the admin client.
//!
//! - [`ResourceId`]: a trimmed, non-empty record identifier
//! - [`Reference`]: a relationship to another ledger record, written on the wire as
//!   `resource:<class>#<id>`

use std::fmt;
use std::str::FromStr;

/// Prefix the ledger gateway uses for relationship strings.
pub const REFERENCE_PREFIX: &str = "resource:";

/// Errors that can occur when creating validated identifier types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The identifier was empty or contained only whitespace
    #[error("identifier cannot be empty")]
    EmptyId,
    /// A relationship string did not start with `resource:`
    #[error("reference must start with '{REFERENCE_PREFIX}': {0}")]
    MissingPrefix(String),
    /// A relationship string had no `#` separating class and id
    #[error("reference must have the form resource:<class>#<id>: {0}")]
    MalformedReference(String),
}

/// A record identifier that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a new `ResourceId` from the given input.
    ///
    /// # Returns
    ///
    /// Returns `Ok(ResourceId)` if the trimmed input is non-empty,
    /// or `Err(TypesError::EmptyId)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ResourceId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ResourceId::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A relationship to another ledger record.
///
/// The class is the fully qualified type name (for example
/// `com.laresblockchain.healthcare.Patient`); the id is that record's identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    class: String,
    id: ResourceId,
}

impl Reference {
    /// Creates a reference to the record `id` of type `class`.
    pub fn new(class: impl Into<String>, id: ResourceId) -> Self {
        Self {
            class: class.into(),
            id,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{REFERENCE_PREFIX}{}#{}", self.class, self.id)
    }
}

impl FromStr for Reference {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(REFERENCE_PREFIX)
            .ok_or_else(|| TypesError::MissingPrefix(s.to_owned()))?;
        let (class, id) = rest
            .split_once('#')
            .ok_or_else(|| TypesError::MalformedReference(s.to_owned()))?;
        if class.trim().is_empty() {
            return Err(TypesError::MalformedReference(s.to_owned()));
        }
        Ok(Self::new(class.trim(), ResourceId::new(id)?))
    }
}

impl serde::Serialize for Reference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Reference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
