//! Entity form controller.
//!
//! One controller per entity kind owns the bound form, the most recently fetched list, the
//! selected record id and the last error message. Every operation catches its own failure and
//! turns it into that message; success clears it.
//!
//! Operations borrow the controller mutably, so a controller never has two requests in flight.

use crate::config::ClearPolicy;
use crate::constants::NO_SELECTION_MESSAGE;
use crate::entity::{EntityKind, Field};
use crate::form::Form;
use crate::service::EntityService;
use crate::{FormResult, GatewayError};
use lares_model::{LedgerType, ModelResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub struct EntityController<S> {
    kind: EntityKind,
    class_name: String,
    service: S,
    form: Form,
    records: Vec<Value>,
    current_id: Option<String>,
    error_message: Option<String>,
    clear_policy: ClearPolicy,
}

impl<S: EntityService> EntityController<S> {
    pub fn new(kind: EntityKind, service: S, clear_policy: ClearPolicy) -> Self {
        Self {
            kind,
            class_name: kind.class_name(),
            service,
            form: Form::new(kind),
            records: Vec::new(),
            current_id: None,
            error_message: None,
            clear_policy,
        }
    }

    /// Fetch the whole collection. On failure the previous list is kept.
    pub async fn load_all(&mut self) {
        match self.service.get_all().await {
            Ok(records) => {
                self.error_message = None;
                self.records = records;
            }
            Err(err) => self.fail("load", err),
        }
    }

    /// Create a record from the bound form.
    pub async fn add(&mut self) {
        let record = self.form.to_record(&self.class_name, true);
        if self.clear_policy == ClearPolicy::Optimistic {
            self.form.reset();
        }

        match self.service.add(&record).await {
            Ok(_) => {
                self.error_message = None;
                self.form.reset();
                if self.kind.reloads_after_write() {
                    self.load_all().await;
                }
            }
            Err(err) => self.fail("add", err),
        }
    }

    /// Update record `id` from every bound field except the identifier.
    pub async fn update(&mut self, id: &str) {
        let record = self.form.to_record(&self.class_name, false);
        match self.service.update(id, &record).await {
            Ok(_) => {
                self.error_message = None;
                if self.kind.reloads_after_write() {
                    self.load_all().await;
                }
            }
            Err(err) => self.fail("update", err),
        }
    }

    /// Delete the record chosen with [`set_id`](Self::set_id).
    pub async fn delete(&mut self) {
        let Some(id) = self.current_id.clone() else {
            tracing::warn!(entity = %self.kind, "delete without a selected record");
            self.error_message = Some(NO_SELECTION_MESSAGE.to_owned());
            return;
        };

        match self.service.delete(&id).await {
            Ok(()) => {
                self.error_message = None;
                if self.kind.reloads_after_write() {
                    self.load_all().await;
                }
            }
            Err(err) => self.fail("delete", err),
        }
    }

    /// Select the record the next `delete` targets. The id is not checked.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.current_id = Some(id.into());
    }

    /// Fetch record `id` into the form; fields the record lacks are cleared.
    pub async fn get_form(&mut self, id: &str) {
        match self.service.get(id).await {
            Ok(record) => {
                self.error_message = None;
                self.form.fill_from(&record);
            }
            Err(err) => self.fail("get", err),
        }
    }

    pub fn reset_form(&mut self) {
        self.form.reset();
    }

    pub fn set_field(&mut self, field: Field, value: Value) -> FormResult<()> {
        self.form.set(field, value)
    }

    pub fn change_array_value(&mut self, field: Field, value: Value) -> FormResult<()> {
        self.form.change_array_value(field, value)
    }

    pub fn has_array_value(&self, field: Field, value: &Value) -> bool {
        self.form.has_array_value(field, value)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Decode the cached list into model records.
    pub fn typed_records<T>(&self) -> ModelResult<Vec<T>>
    where
        T: LedgerType + DeserializeOwned,
    {
        self.records
            .iter()
            .cloned()
            .map(lares_model::from_value)
            .collect()
    }

    fn fail(&mut self, operation: &str, err: GatewayError) {
        tracing::warn!(entity = %self.kind, operation, error = %err, "gateway request failed");
        self.error_message = Some(err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{NOT_FOUND_MESSAGE, UNREACHABLE_MESSAGE};
    use crate::GatewayResult;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        get_all: usize,
        get: Vec<String>,
        add: Vec<Value>,
        update: Vec<(String, Value)>,
        delete: Vec<String>,
    }

    /// In-memory service that echoes writes and can be told to fail every call.
    #[derive(Clone, Default)]
    struct MockService {
        records: Arc<Mutex<Vec<Value>>>,
        calls: Arc<Mutex<Calls>>,
        failure: Arc<Mutex<Option<GatewayError>>>,
    }

    impl MockService {
        fn with_records(records: Vec<Value>) -> Self {
            let mock = Self::default();
            *mock.records.lock().unwrap() = records;
            mock
        }

        fn fail_with(&self, err: GatewayError) {
            *self.failure.lock().unwrap() = Some(err);
        }

        fn recover(&self) {
            *self.failure.lock().unwrap() = None;
        }

        fn check(&self) -> GatewayResult<()> {
            match self.failure.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn get_all_calls(&self) -> usize {
            self.calls.lock().unwrap().get_all
        }
    }

    impl EntityService for MockService {
        async fn get_all(&self) -> GatewayResult<Vec<Value>> {
            self.calls.lock().unwrap().get_all += 1;
            self.check()?;
            Ok(self.records.lock().unwrap().clone())
        }

        async fn get(&self, id: &str) -> GatewayResult<Value> {
            self.calls.lock().unwrap().get.push(id.to_owned());
            self.check()?;
            self.records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.as_object().into_iter().flat_map(|o| o.values()).any(|v| v == id))
                .cloned()
                .ok_or(GatewayError::NotFound)
        }

        async fn add(&self, record: &Value) -> GatewayResult<Value> {
            self.calls.lock().unwrap().add.push(record.clone());
            self.check()?;
            self.records.lock().unwrap().push(record.clone());
            Ok(record.clone())
        }

        async fn update(&self, id: &str, record: &Value) -> GatewayResult<Value> {
            self.calls
                .lock()
                .unwrap()
                .update
                .push((id.to_owned(), record.clone()));
            self.check()?;
            Ok(record.clone())
        }

        async fn delete(&self, id: &str) -> GatewayResult<()> {
            self.calls.lock().unwrap().delete.push(id.to_owned());
            self.check()
        }
    }

    fn controller(kind: EntityKind, mock: &MockService) -> EntityController<MockService> {
        EntityController::new(kind, mock.clone(), ClearPolicy::Optimistic)
    }

    fn fill_sample(ctl: &mut EntityController<MockService>) {
        ctl.set_field(Field::SampleId, json!("S1")).unwrap();
        ctl.set_field(Field::Patient, json!("P1")).unwrap();
        ctl.set_field(Field::SampleType, json!("Blood")).unwrap();
        ctl.set_field(Field::SampleStatus, json!("Live")).unwrap();
    }

    #[tokio::test]
    async fn add_clears_form_and_reloads_once() {
        let mock = MockService::default();
        let mut ctl = controller(EntityKind::Sample, &mock);
        fill_sample(&mut ctl);

        ctl.add().await;

        assert!(ctl.form().is_cleared());
        assert_eq!(ctl.error_message(), None);
        assert_eq!(mock.get_all_calls(), 1);
        assert_eq!(ctl.records().len(), 1);

        let sent = &mock.calls.lock().unwrap().add[0];
        assert_eq!(sent["$class"], "com.laresblockchain.healthcare.Sample");
        assert_eq!(sent["sampleId"], "S1");
        assert_eq!(sent["patient"], "P1");
        assert_eq!(sent["storageDate"], Value::Null);
    }

    #[tokio::test]
    async fn transactions_do_not_reload_after_add() {
        let mock = MockService::default();
        let mut ctl = controller(EntityKind::CreateSample, &mock);
        ctl.set_field(Field::Creator, json!("resource:com.laresblockchain.healthcare.Business#B1"))
            .unwrap();

        ctl.add().await;

        assert!(ctl.form().is_cleared());
        assert_eq!(mock.get_all_calls(), 0);
        assert_eq!(
            mock.calls.lock().unwrap().add[0]["$class"],
            "com.laresblockchain.healthcare.CreateSample"
        );
    }

    #[tokio::test]
    async fn transactions_do_not_reload_after_update_or_delete() {
        let mock = MockService::default();
        let mut ctl = controller(EntityKind::UpdateSample, &mock);
        ctl.set_field(Field::Sample, json!("resource:com.laresblockchain.healthcare.Sample#S1"))
            .unwrap();

        ctl.update("tx-1").await;
        ctl.set_id("tx-1");
        ctl.delete().await;

        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls.update.len(), 1);
        assert_eq!(calls.delete, vec!["tx-1".to_string()]);
        assert_eq!(calls.get_all, 0);
        drop(calls);
        assert_eq!(ctl.error_message(), None);
    }

    #[tokio::test]
    async fn missing_route_is_reported_for_every_write() {
        let mock = MockService::default();
        mock.fail_with(GatewayError::NotFound);
        let mut ctl = controller(EntityKind::Sample, &mock);

        fill_sample(&mut ctl);
        ctl.add().await;
        assert_eq!(ctl.error_message(), Some(NOT_FOUND_MESSAGE));

        ctl.update("S1").await;
        assert_eq!(ctl.error_message(), Some(NOT_FOUND_MESSAGE));

        ctl.set_id("S1");
        ctl.delete().await;
        assert_eq!(ctl.error_message(), Some(NOT_FOUND_MESSAGE));

        let calls = mock.calls.lock().unwrap();
        assert_eq!((calls.add.len(), calls.update.len(), calls.delete.len()), (1, 1, 1));
        assert_eq!(calls.get_all, 0);
    }

    #[tokio::test]
    async fn optimistic_add_loses_input_on_failure() {
        let mock = MockService::default();
        mock.fail_with(GatewayError::Unreachable);
        let mut ctl = controller(EntityKind::Sample, &mock);
        fill_sample(&mut ctl);

        ctl.add().await;

        assert!(ctl.form().is_cleared());
        assert_eq!(ctl.error_message(), Some(UNREACHABLE_MESSAGE));
        assert_eq!(mock.get_all_calls(), 0);
    }

    #[tokio::test]
    async fn on_success_policy_keeps_input_on_failure() {
        let mock = MockService::default();
        mock.fail_with(GatewayError::Other("sampleId is required".into()));
        let mut ctl = EntityController::new(EntityKind::Sample, mock.clone(), ClearPolicy::OnSuccess);
        fill_sample(&mut ctl);

        ctl.add().await;

        assert_eq!(ctl.form().get(Field::SampleId), Some(&json!("S1")));
        assert_eq!(ctl.error_message(), Some("sampleId is required"));

        mock.recover();
        ctl.add().await;
        assert!(ctl.form().is_cleared());
        assert_eq!(ctl.error_message(), None);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_list() {
        let mock = MockService::with_records(vec![json!({"patientId": "P1"})]);
        let mut ctl = controller(EntityKind::Patient, &mock);
        ctl.load_all().await;
        assert_eq!(ctl.records().len(), 1);

        mock.fail_with(GatewayError::Unreachable);
        ctl.load_all().await;
        assert_eq!(ctl.error_message(), Some(UNREACHABLE_MESSAGE));
        assert_eq!(ctl.records(), &[json!({"patientId": "P1"})]);

        mock.fail_with(GatewayError::NotFound);
        ctl.load_all().await;
        assert_eq!(ctl.error_message(), Some(NOT_FOUND_MESSAGE));
        assert_eq!(ctl.records().len(), 1);
    }

    #[tokio::test]
    async fn success_clears_previous_error() {
        let mock = MockService::default();
        mock.fail_with(GatewayError::NotFound);
        let mut ctl = controller(EntityKind::Business, &mock);
        ctl.load_all().await;
        assert_eq!(ctl.error_message(), Some(NOT_FOUND_MESSAGE));

        mock.recover();
        ctl.load_all().await;
        assert_eq!(ctl.error_message(), None);
    }

    #[tokio::test]
    async fn unreachable_is_reported_for_every_write() {
        let mock = MockService::default();
        mock.fail_with(GatewayError::Unreachable);
        let mut ctl = controller(EntityKind::Doctor, &mock);
        ctl.set_id("D1");

        ctl.update("D1").await;
        assert_eq!(ctl.error_message(), Some(UNREACHABLE_MESSAGE));

        ctl.delete().await;
        assert_eq!(ctl.error_message(), Some(UNREACHABLE_MESSAGE));
        assert_eq!(mock.get_all_calls(), 0);
    }

    #[tokio::test]
    async fn other_failures_are_shown_verbatim() {
        let mock = MockService::default();
        mock.fail_with(GatewayError::Other("500 - Internal Server Error".into()));
        let mut ctl = controller(EntityKind::UpdateSample, &mock);
        ctl.get_form("tx-1").await;
        assert_eq!(ctl.error_message(), Some("500 - Internal Server Error"));
    }

    #[tokio::test]
    async fn update_omits_identifier_and_reloads() {
        let mock = MockService::default();
        let mut ctl = controller(EntityKind::Sample, &mock);
        fill_sample(&mut ctl);

        ctl.update("S1").await;

        let calls = mock.calls.lock().unwrap();
        let (id, record) = &calls.update[0];
        assert_eq!(id, "S1");
        assert!(record.get("sampleId").is_none());
        assert_eq!(record["sampleType"], "Blood");
        assert_eq!(calls.get_all, 1);
        drop(calls);
        // the form is left as it was
        assert_eq!(ctl.form().get(Field::SampleId), Some(&json!("S1")));
    }

    #[tokio::test]
    async fn delete_targets_selected_id() {
        let mock = MockService::default();
        let mut ctl = controller(EntityKind::Patient, &mock);
        ctl.set_id("P9");
        assert_eq!(ctl.current_id(), Some("P9"));

        ctl.delete().await;

        assert_eq!(mock.calls.lock().unwrap().delete, vec!["P9".to_string()]);
        assert_eq!(mock.get_all_calls(), 1);
        assert_eq!(ctl.error_message(), None);
    }

    #[tokio::test]
    async fn delete_without_selection_sends_nothing() {
        let mock = MockService::default();
        let mut ctl = controller(EntityKind::Patient, &mock);

        ctl.delete().await;

        assert!(mock.calls.lock().unwrap().delete.is_empty());
        assert_eq!(ctl.error_message(), Some(NO_SELECTION_MESSAGE));
    }

    #[tokio::test]
    async fn get_form_nulls_absent_fields() {
        let mock = MockService::with_records(vec![json!({
            "$class": "com.laresblockchain.healthcare.Business",
            "businessId": "B1",
            "businessName": "Groote Lab",
            "permissions": ["READ"]
        })]);
        let mut ctl = controller(EntityKind::Business, &mock);
        ctl.set_field(Field::Role, json!("stale")).unwrap();

        ctl.get_form("B1").await;

        assert_eq!(ctl.error_message(), None);
        assert_eq!(ctl.form().get(Field::BusinessName), Some(&json!("Groote Lab")));
        assert_eq!(ctl.form().get(Field::BusinessAddress), Some(&Value::Null));
        assert_eq!(ctl.form().get(Field::Role), Some(&Value::Null));
        assert!(ctl.has_array_value(Field::Permissions, &json!("READ")));
    }

    #[tokio::test]
    async fn get_form_on_missing_record_is_not_found() {
        let mock = MockService::default();
        let mut ctl = controller(EntityKind::Sample, &mock);
        ctl.get_form("nope").await;
        assert_eq!(ctl.error_message(), Some(NOT_FOUND_MESSAGE));
    }

    #[test]
    fn array_toggle_round_trips_through_controller() {
        let mock = MockService::default();
        let mut ctl = controller(EntityKind::Doctor, &mock);

        ctl.change_array_value(Field::Permissions, json!("WRITE")).unwrap();
        assert!(ctl.has_array_value(Field::Permissions, &json!("WRITE")));
        ctl.change_array_value(Field::Permissions, json!("WRITE")).unwrap();
        assert!(!ctl.has_array_value(Field::Permissions, &json!("WRITE")));
        assert_eq!(ctl.form().get(Field::Permissions), Some(&Value::Null));
    }

    #[test]
    fn reset_form_nulls_everything() {
        for kind in EntityKind::ALL {
            let mock = MockService::default();
            let mut ctl = controller(kind, &mock);
            ctl.set_field(kind.id_field(), json!("X")).unwrap();
            ctl.reset_form();
            for field in kind.fields() {
                assert_eq!(ctl.form().get(*field), Some(&Value::Null));
            }
        }
    }

    #[tokio::test]
    async fn typed_records_decode_cached_list() {
        let mock = MockService::with_records(vec![json!({
            "$class": "com.laresblockchain.healthcare.Patient",
            "patientId": "P1",
            "firstName": "Thandi",
            "lastName": "Nkosi",
            "birthDate": "1988-07-14",
            "doctors": ["D1"]
        })]);
        let mut ctl = controller(EntityKind::Patient, &mock);
        ctl.load_all().await;

        let patients: Vec<lares_model::Patient> = ctl.typed_records().expect("decode");
        assert_eq!(patients[0].doctors, vec!["D1"]);
    }
}
