//! Transaction requests sent to the ledger, and the event it emits for samples.
//!
//! None of these are stored locally. The ledger assigns `transactionId`/`eventId` and
//! `timestamp` when the caller leaves them out.

use crate::{Category, LedgerType, Sample};
use chrono::{DateTime, Utc};
use lares_types::Reference;
use serde::{Deserialize, Serialize};

/// Register a new sample on behalf of a business.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "$class",
    rename = "com.laresblockchain.healthcare.CreateSample",
    rename_all = "camelCase"
)]
pub struct CreateSample {
    pub creator: Reference,
    pub new_sample: Sample,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl LedgerType for CreateSample {
    const NAME: &'static str = "CreateSample";
    const CATEGORY: Category = Category::Transaction;
}

/// Audited read of a sample by a business.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "$class",
    rename = "com.laresblockchain.healthcare.GetSample",
    rename_all = "camelCase"
)]
pub struct GetSample {
    pub requestor: Reference,
    pub sample: Sample,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl LedgerType for GetSample {
    const NAME: &'static str = "GetSample";
    const CATEGORY: Category = Category::Transaction;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "$class",
    rename = "com.laresblockchain.healthcare.UpdateSample",
    rename_all = "camelCase"
)]
pub struct UpdateSample {
    pub updater: Reference,
    pub sample: Sample,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl LedgerType for UpdateSample {
    const NAME: &'static str = "UpdateSample";
    const CATEGORY: Category = Category::Transaction;
}

/// Notification emitted by the ledger when a sample changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "$class",
    rename = "com.laresblockchain.healthcare.SampleEvent",
    rename_all = "camelCase"
)]
pub struct SampleEvent {
    pub sample: Sample,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl LedgerType for SampleEvent {
    const NAME: &'static str = "SampleEvent";
    const CATEGORY: Category = Category::Event;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::sample_json;
    use crate::{from_value, Business, ResourceId};

    #[test]
    fn create_sample_omits_ledger_assigned_fields() {
        let sample: Sample = from_value(sample_json()).unwrap();
        let tx = CreateSample {
            creator: Business::reference(ResourceId::new("B1").unwrap()),
            new_sample: sample,
            transaction_id: None,
            timestamp: None,
        };

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["$class"], "com.laresblockchain.healthcare.CreateSample");
        assert_eq!(
            value["creator"],
            "resource:com.laresblockchain.healthcare.Business#B1"
        );
        assert!(value.get("transactionId").is_none());
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn decodes_ledger_transaction_with_id() {
        let mut value = serde_json::json!({
            "$class": "com.laresblockchain.healthcare.UpdateSample",
            "updater": "resource:com.laresblockchain.healthcare.Business#B1",
            "transactionId": "0f3c",
            "timestamp": "2024-03-02T08:00:00Z"
        });
        value["sample"] = sample_json();

        let tx: UpdateSample = from_value(value).expect("decode update");
        assert_eq!(tx.transaction_id.as_deref(), Some("0f3c"));
        assert_eq!(tx.sample.sample_id, "S1");
    }
}
