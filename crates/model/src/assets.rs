//! Sample asset and the concepts embedded in it.

use crate::{Category, LedgerType, ModelError};
use chrono::{DateTime, Utc};
use lares_types::Reference;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a stored sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Live,
    Static,
    Expired,
    Deleted,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Live, Status::Static, Status::Expired, Status::Deleted];

    /// Wire name of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Live => "Live",
            Status::Static => "Static",
            Status::Expired => "Expired",
            Status::Deleted => "Deleted",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ModelError::InvalidValue(format!("unknown sample status: {s}")))
    }
}

/// Postal address embedded in samples and businesses. Has no identity of its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "$class",
    rename = "com.laresblockchain.healthcare.Address",
    rename_all = "camelCase"
)]
pub struct Address {
    pub number: i64,
    pub street_name: String,
    pub district: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: String,
}

impl LedgerType for Address {
    const NAME: &'static str = "Address";
    const CATEGORY: Category = Category::Concept;
}

/// A stored biological sample.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "$class",
    rename = "com.laresblockchain.healthcare.Sample",
    rename_all = "camelCase"
)]
pub struct Sample {
    pub sample_id: String,
    /// The patient the sample was taken from.
    pub patient: Reference,
    pub sample_type: String,
    pub sample_date: DateTime<Utc>,
    pub sample_status: Status,
    pub sample_location: Address,
    pub expiry_date: DateTime<Utc>,
    pub storage_date: DateTime<Utc>,
}

impl LedgerType for Sample {
    const NAME: &'static str = "Sample";
    const CATEGORY: Category = Category::Asset;
}

/// Free-text analysis produced by a business.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "$class",
    rename = "com.laresblockchain.healthcare.Analysis",
    rename_all = "camelCase"
)]
pub struct Analysis {
    pub analysis_id: i64,
    pub analysis_name: String,
    pub analysis: String,
    pub business: Reference,
}

impl LedgerType for Analysis {
    const NAME: &'static str = "Analysis";
    const CATEGORY: Category = Category::Concept;
}
