//! Ledger schema mirror for the `com.laresblockchain.healthcare` business network.
//!
//! This crate provides **wire models** for the records the REST gateway exchanges:
//! - assets (`Sample`) and their embedded concepts (`Address`, `Analysis`)
//! - participants (`Patient`, `Business`, `Doctor`)
//! - transactions (`CreateSample`, `GetSample`, `UpdateSample`) and `SampleEvent`
//!
//! The records are passive. Validation of required fields and referential integrity happens
//! on the ledger side; this crate only fixes field names, types and the `$class` discriminator.

pub mod assets;
pub mod participants;
pub mod transactions;

pub use assets::{Address, Analysis, Sample, Status};
pub use participants::{Business, Doctor, Patient};
pub use transactions::{CreateSample, GetSample, SampleEvent, UpdateSample};

// Relationship primitives live in the types crate.
pub use lares_types::{Reference, ResourceId, TypesError};

use serde::de::DeserializeOwned;

/// Namespace every ledger type in this network is declared under.
pub const NAMESPACE: &str = "com.laresblockchain.healthcare";

/// Key of the type discriminator carried by every record.
pub const CLASS_KEY: &str = "$class";

/// Errors returned by the `lares-model` crate.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("record has no {CLASS_KEY} discriminator")]
    MissingClass,

    #[error("expected {CLASS_KEY} {expected}, found {found}")]
    ClassMismatch { expected: String, found: String },

    #[error("invalid record: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Types(#[from] TypesError),
}

/// Type alias for Results that can fail with a [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Kind of declaration a ledger type comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Asset,
    Participant,
    Transaction,
    Event,
    Concept,
}

/// A type declared in the ledger's business network.
pub trait LedgerType {
    /// Short type name, e.g. `Sample`.
    const NAME: &'static str;

    const CATEGORY: Category;

    /// Fully qualified name used as the `$class` value.
    fn class_name() -> String {
        format!("{NAMESPACE}.{}", Self::NAME)
    }

    /// Reference to the record `id` of this type.
    fn reference(id: ResourceId) -> Reference {
        Reference::new(Self::class_name(), id)
    }
}

/// Decode a gateway JSON record into a model type.
///
/// The `$class` discriminator must be present and name `T`.
pub fn from_value<T>(value: serde_json::Value) -> ModelResult<T>
where
    T: LedgerType + DeserializeOwned,
{
    let expected = T::class_name();
    match value.get(CLASS_KEY).and_then(|class| class.as_str()) {
        None => return Err(ModelError::MissingClass),
        Some(found) if found != expected => {
            return Err(ModelError::ClassMismatch {
                expected,
                found: found.to_owned(),
            })
        }
        Some(_) => {}
    }
    Ok(serde_json::from_value(value)?)
}
