//! Form state bound to one entity kind.
//!
//! A form holds one JSON value per bound field. `Value::Null` is the cleared state; a field is
//! never missing. Array fields (checkbox groups) keep either `Null`, meaning nothing selected,
//! or a non-empty array, so toggling a value in and out again restores the original state.

use crate::entity::{EntityKind, Field};
use crate::{FormError, FormResult};
use lares_model::CLASS_KEY;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct Form {
    kind: EntityKind,
    values: BTreeMap<Field, Value>,
}

impl Form {
    /// Create a cleared form for `kind`.
    pub fn new(kind: EntityKind) -> Self {
        let values = kind.fields().iter().map(|f| (*f, Value::Null)).collect();
        Self { kind, values }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Current value of `field`, or `None` when the field is not bound to this form.
    pub fn get(&self, field: Field) -> Option<&Value> {
        self.values.get(&field)
    }

    pub fn set(&mut self, field: Field, value: Value) -> FormResult<()> {
        let slot = self.slot(field)?;
        *slot = normalise(field, value);
        Ok(())
    }

    /// Set every bound field to `null`.
    pub fn reset(&mut self) {
        for value in self.values.values_mut() {
            *value = Value::Null;
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.values.values().all(Value::is_null)
    }

    /// Bound fields and their values, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &Value)> + '_ {
        self.kind
            .fields()
            .iter()
            .filter_map(move |f| self.values.get(f).map(|v| (*f, v)))
    }

    /// Replace the form contents with the matching keys of `record`.
    ///
    /// Keys missing from the record, or present as `null`, clear their field.
    pub fn fill_from(&mut self, record: &Value) {
        for (field, value) in self.values.iter_mut() {
            let incoming = record
                .get(field.as_str())
                .cloned()
                .unwrap_or(Value::Null);
            *value = normalise(*field, incoming);
        }
    }

    /// Build the outbound record: the `$class` discriminator followed by the bound fields.
    ///
    /// The identifier is left out when `include_id` is false (updates address the record by
    /// URL and never change its id). An empty selection in an array field is sent as `[]`.
    pub fn to_record(&self, class_name: &str, include_id: bool) -> Value {
        let id_field = self.kind.id_field();
        let mut record = Map::new();
        record.insert(CLASS_KEY.to_owned(), Value::String(class_name.to_owned()));
        for (field, value) in self.iter() {
            if field == id_field && !include_id {
                continue;
            }
            let value = match value {
                Value::Null if field.is_array() => Value::Array(Vec::new()),
                other => other.clone(),
            };
            record.insert(field.as_str().to_owned(), value);
        }
        Value::Object(record)
    }

    /// Toggle `value` in an array field: append when absent, otherwise remove its first
    /// occurrence.
    pub fn change_array_value(&mut self, field: Field, value: Value) -> FormResult<()> {
        if !field.is_array() {
            return Err(FormError::NotAnArray(field));
        }
        let slot = self.slot(field)?;
        let mut items = match std::mem::take(slot) {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            other => {
                *slot = other;
                return Err(FormError::NotAnArray(field));
            }
        };

        match items.iter().position(|item| *item == value) {
            Some(index) => {
                items.remove(index);
            }
            None => items.push(value),
        }
        *slot = normalise(field, Value::Array(items));
        Ok(())
    }

    /// Whether the array field `field` currently contains `value`.
    ///
    /// Unbound and non-array fields never contain anything.
    pub fn has_array_value(&self, field: Field, value: &Value) -> bool {
        match self.values.get(&field) {
            Some(Value::Array(items)) => items.contains(value),
            _ => false,
        }
    }

    fn slot(&mut self, field: Field) -> FormResult<&mut Value> {
        let kind = self.kind;
        if !kind.binds(field) {
            return Err(FormError::UnboundField { kind, field });
        }
        Ok(self.values.entry(field).or_insert(Value::Null))
    }
}

fn normalise(field: Field, value: Value) -> Value {
    match value {
        Value::Array(items) if field.is_array() && items.is_empty() => Value::Null,
        other => other,
    }
}
