//! Entity registry: which ledger resources the admin client manages and which form fields
//! each one binds.
//!
//! Field names are an explicit enum rather than strings so that a form can only be addressed
//! by a field it actually has; [`Field::from_str`] maps the camelCase wire names back.

use crate::FormError;
use lares_model::{
    Business, Category, CreateSample, Doctor, GetSample, LedgerType, Patient, Sample,
    UpdateSample,
};
use lares_types::{Reference, ResourceId, TypesError};
use std::fmt;
use std::str::FromStr;

/// A form field, named after the record key it binds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    // Sample
    SampleId,
    Patient,
    SampleType,
    SampleDate,
    SampleStatus,
    SampleLocation,
    ExpiryDate,
    StorageDate,
    // Patient
    PatientId,
    FirstName,
    LastName,
    BirthDate,
    Doctors,
    // Business / Doctor
    BusinessId,
    DoctorId,
    BusinessName,
    BusinessAddress,
    Permissions,
    Role,
    // Transactions
    TransactionId,
    Creator,
    NewSample,
    Requestor,
    Updater,
    Sample,
    Timestamp,
}

impl Field {
    pub const ALL: [Field; 26] = [
        Field::SampleId,
        Field::Patient,
        Field::SampleType,
        Field::SampleDate,
        Field::SampleStatus,
        Field::SampleLocation,
        Field::ExpiryDate,
        Field::StorageDate,
        Field::PatientId,
        Field::FirstName,
        Field::LastName,
        Field::BirthDate,
        Field::Doctors,
        Field::BusinessId,
        Field::DoctorId,
        Field::BusinessName,
        Field::BusinessAddress,
        Field::Permissions,
        Field::Role,
        Field::TransactionId,
        Field::Creator,
        Field::NewSample,
        Field::Requestor,
        Field::Updater,
        Field::Sample,
        Field::Timestamp,
    ];

    /// Record key for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::SampleId => "sampleId",
            Field::Patient => "patient",
            Field::SampleType => "sampleType",
            Field::SampleDate => "sampleDate",
            Field::SampleStatus => "sampleStatus",
            Field::SampleLocation => "sampleLocation",
            Field::ExpiryDate => "expiryDate",
            Field::StorageDate => "storageDate",
            Field::PatientId => "patientId",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::BirthDate => "birthDate",
            Field::Doctors => "doctors",
            Field::BusinessId => "businessId",
            Field::DoctorId => "doctorId",
            Field::BusinessName => "businessName",
            Field::BusinessAddress => "businessAddress",
            Field::Permissions => "permissions",
            Field::Role => "role",
            Field::TransactionId => "transactionId",
            Field::Creator => "creator",
            Field::NewSample => "newSample",
            Field::Requestor => "requestor",
            Field::Updater => "updater",
            Field::Sample => "sample",
            Field::Timestamp => "timestamp",
        }
    }

    /// Whether the field holds a multi-select list (checkbox group).
    pub fn is_array(self) -> bool {
        matches!(self, Field::Doctors | Field::Permissions)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_owned()))
    }
}

const SAMPLE_FIELDS: &[Field] = &[
    Field::SampleId,
    Field::Patient,
    Field::SampleType,
    Field::SampleDate,
    Field::SampleStatus,
    Field::SampleLocation,
    Field::ExpiryDate,
    Field::StorageDate,
];

const PATIENT_FIELDS: &[Field] = &[
    Field::PatientId,
    Field::FirstName,
    Field::LastName,
    Field::BirthDate,
    Field::Doctors,
];

const BUSINESS_FIELDS: &[Field] = &[
    Field::BusinessId,
    Field::BusinessName,
    Field::BusinessAddress,
    Field::Permissions,
    Field::Role,
];

const DOCTOR_FIELDS: &[Field] = &[
    Field::DoctorId,
    Field::BusinessName,
    Field::BusinessAddress,
    Field::Permissions,
    Field::Role,
];

const CREATE_SAMPLE_FIELDS: &[Field] = &[
    Field::TransactionId,
    Field::Creator,
    Field::NewSample,
    Field::Timestamp,
];

const GET_SAMPLE_FIELDS: &[Field] = &[
    Field::TransactionId,
    Field::Requestor,
    Field::Sample,
    Field::Timestamp,
];

const UPDATE_SAMPLE_FIELDS: &[Field] = &[
    Field::TransactionId,
    Field::Updater,
    Field::Sample,
    Field::Timestamp,
];

/// A ledger resource the admin client manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Sample,
    Patient,
    Business,
    Doctor,
    CreateSample,
    GetSample,
    UpdateSample,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Sample,
        EntityKind::Patient,
        EntityKind::Business,
        EntityKind::Doctor,
        EntityKind::CreateSample,
        EntityKind::GetSample,
        EntityKind::UpdateSample,
    ];

    /// REST collection name, which is also the ledger type name.
    pub fn resource(self) -> &'static str {
        match self {
            EntityKind::Sample => Sample::NAME,
            EntityKind::Patient => Patient::NAME,
            EntityKind::Business => Business::NAME,
            EntityKind::Doctor => Doctor::NAME,
            EntityKind::CreateSample => CreateSample::NAME,
            EntityKind::GetSample => GetSample::NAME,
            EntityKind::UpdateSample => UpdateSample::NAME,
        }
    }

    /// Value stamped into the `$class` discriminator of outbound records.
    pub fn class_name(self) -> String {
        match self {
            EntityKind::Sample => Sample::class_name(),
            EntityKind::Patient => Patient::class_name(),
            EntityKind::Business => Business::class_name(),
            EntityKind::Doctor => Doctor::class_name(),
            EntityKind::CreateSample => CreateSample::class_name(),
            EntityKind::GetSample => GetSample::class_name(),
            EntityKind::UpdateSample => UpdateSample::class_name(),
        }
    }

    pub fn category(self) -> Category {
        match self {
            EntityKind::Sample => Sample::CATEGORY,
            EntityKind::Patient => Patient::CATEGORY,
            EntityKind::Business => Business::CATEGORY,
            EntityKind::Doctor => Doctor::CATEGORY,
            EntityKind::CreateSample => CreateSample::CATEGORY,
            EntityKind::GetSample => GetSample::CATEGORY,
            EntityKind::UpdateSample => UpdateSample::CATEGORY,
        }
    }

    /// Bound form fields, identifier first.
    pub fn fields(self) -> &'static [Field] {
        match self {
            EntityKind::Sample => SAMPLE_FIELDS,
            EntityKind::Patient => PATIENT_FIELDS,
            EntityKind::Business => BUSINESS_FIELDS,
            EntityKind::Doctor => DOCTOR_FIELDS,
            EntityKind::CreateSample => CREATE_SAMPLE_FIELDS,
            EntityKind::GetSample => GET_SAMPLE_FIELDS,
            EntityKind::UpdateSample => UPDATE_SAMPLE_FIELDS,
        }
    }

    /// The identifying field. It is sent on create and never on update.
    pub fn id_field(self) -> Field {
        self.fields()[0]
    }

    pub fn binds(self, field: Field) -> bool {
        self.fields().contains(&field)
    }

    /// Assets and participants have a list view that is refreshed after every write.
    /// Transactions are fire-and-forget.
    pub fn reloads_after_write(self) -> bool {
        matches!(self.category(), Category::Asset | Category::Participant)
    }

    /// Relationship string pointing at record `id` of this kind.
    pub fn reference(self, id: &str) -> Result<Reference, TypesError> {
        Ok(Reference::new(self.class_name(), ResourceId::new(id)?))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

impl FromStr for EntityKind {
    type Err = FormError;

    /// Case-insensitive; `-` and `_` are ignored, so `create-sample` names `CreateSample`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.resource().to_ascii_lowercase() == wanted)
            .ok_or_else(|| FormError::UnknownEntity(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_parses_from_its_name() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>().unwrap(), field);
        }
        assert!(matches!(
            "SampleId".parse::<Field>(),
            Err(FormError::UnknownField(_))
        ));
    }

    #[test]
    fn every_field_belongs_to_some_entity() {
        for field in Field::ALL {
            assert!(
                EntityKind::ALL.iter().any(|kind| kind.binds(field)),
                "{field} is not bound anywhere"
            );
        }
    }

    #[test]
    fn entity_names_parse_loosely() {
        assert_eq!("sample".parse::<EntityKind>().unwrap(), EntityKind::Sample);
        assert_eq!(
            "create-sample".parse::<EntityKind>().unwrap(),
            EntityKind::CreateSample
        );
        assert_eq!(
            "UpdateSample".parse::<EntityKind>().unwrap(),
            EntityKind::UpdateSample
        );
        assert!("Analysis".parse::<EntityKind>().is_err());
    }

    #[test]
    fn only_assets_and_participants_reload() {
        assert!(EntityKind::Sample.reloads_after_write());
        assert!(EntityKind::Doctor.reloads_after_write());
        assert!(!EntityKind::CreateSample.reloads_after_write());
        assert!(!EntityKind::GetSample.reloads_after_write());
    }

    #[test]
    fn identifiers_come_first() {
        assert_eq!(EntityKind::Sample.id_field(), Field::SampleId);
        assert_eq!(EntityKind::Doctor.id_field(), Field::DoctorId);
        assert_eq!(EntityKind::UpdateSample.id_field(), Field::TransactionId);
    }

    #[test]
    fn class_names_follow_the_model() {
        assert_eq!(
            EntityKind::GetSample.class_name(),
            "com.laresblockchain.healthcare.GetSample"
        );
        assert_eq!(
            EntityKind::Patient.reference("P1").unwrap().to_string(),
            "resource:com.laresblockchain.healthcare.Patient#P1"
        );
    }
}
