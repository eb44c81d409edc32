//! Constants used throughout the Lares core crate.
//!
//! User-facing messages and configuration defaults live here so the controller, the
//! renderers and the binaries agree on them.

/// Gateway base URL used when no explicit URL is configured.
pub const DEFAULT_REST_URL: &str = "http://localhost:3000/api";

/// Per-request timeout, in seconds, used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shown when the gateway cannot be reached (connection refused, DNS failure, timeout).
pub const UNREACHABLE_MESSAGE: &str =
    "Could not connect to REST server. Please check your configuration details";

/// Shown when the gateway answers 404.
pub const NOT_FOUND_MESSAGE: &str =
    "404 - Could not find API route. Please check your available APIs.";

/// Shown when `delete` runs before any record was selected.
pub const NO_SELECTION_MESSAGE: &str = "No record selected";

/// Environment variable holding the gateway base URL.
pub const ENV_REST_URL: &str = "LEDGER_REST_URL";

/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "LEDGER_TIMEOUT_SECS";

/// Environment variable selecting the form clear policy.
pub const ENV_FORM_CLEAR: &str = "LEDGER_FORM_CLEAR";
