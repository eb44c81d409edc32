//! # Lares Core
//!
//! Client-side logic for administering the healthcare sample ledger through its REST gateway.
//!
//! This crate contains:
//! - Startup configuration (`config`)
//! - The entity registry: resources, their bound fields and `$class` names (`entity`)
//! - Form state with null-clearing and checkbox-style list toggles (`form`)
//! - The service boundary and its `reqwest` implementation (`service`)
//! - The per-entity form controller (`controller`)
//! - Plain-text renderers (`render`)
//!
//! **No presentation loop**: reading commands and printing belongs to the `lares-run` console
//! and the `lares-cli` tool.

pub mod config;
pub mod constants;
pub mod controller;
pub mod entity;
pub mod error;
pub mod form;
pub mod render;
pub mod service;

pub use config::{ClearPolicy, GatewayConfig};
pub use controller::EntityController;
pub use entity::{EntityKind, Field};
pub use error::{
    ConfigError, ConfigResult, FormError, FormResult, GatewayError, GatewayResult,
};
pub use form::Form;
pub use service::{EntityService, Gateway, RestService};

use serde_json::Value;

/// Parse a value typed by a user: valid JSON is taken as-is, anything else as a string.
///
/// `12`, `true`, `null`, `["a"]` and `"quoted"` are JSON; `Blood` becomes `"Blood"`.
pub fn parse_input_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}
