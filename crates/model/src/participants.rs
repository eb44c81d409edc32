//! Participants of the network: patients, businesses and doctors.

use crate::{Address, Category, LedgerType};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "$class",
    rename = "com.laresblockchain.healthcare.Patient",
    rename_all = "camelCase"
)]
pub struct Patient {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Kept as the ledger declares it: free text, no date parsing.
    pub birth_date: String,
    /// Identifiers of the patient's doctors.
    #[serde(default)]
    pub doctors: Vec<String>,
}

impl LedgerType for Patient {
    const NAME: &'static str = "Patient";
    const CATEGORY: Category = Category::Participant;
}

/// An organisation that collects or analyses samples.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "$class",
    rename = "com.laresblockchain.healthcare.Business",
    rename_all = "camelCase"
)]
pub struct Business {
    pub business_id: String,
    pub business_name: String,
    pub business_address: Address,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub role: String,
}

impl LedgerType for Business {
    const NAME: &'static str = "Business";
    const CATEGORY: Category = Category::Participant;
}

/// A doctor, registered against the business they practise at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "$class",
    rename = "com.laresblockchain.healthcare.Doctor",
    rename_all = "camelCase"
)]
pub struct Doctor {
    pub doctor_id: String,
    pub business_name: String,
    pub business_address: Address,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub role: String,
}

impl LedgerType for Doctor {
    const NAME: &'static str = "Doctor";
    const CATEGORY: Category = Category::Participant;
}
