use crate::constants::{NOT_FOUND_MESSAGE, UNREACHABLE_MESSAGE};
use crate::entity::{EntityKind, Field};

/// Failure of a single gateway request.
///
/// The `Display` output is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request never got an HTTP answer.
    #[error("{}", UNREACHABLE_MESSAGE)]
    Unreachable,
    /// The gateway answered 404.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,
    /// Anything else, carried verbatim.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            GatewayError::Unreachable
        } else if err.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            GatewayError::NotFound
        } else if err.is_decode() {
            GatewayError::Other(format!("invalid response body: {err}"))
        } else {
            GatewayError::Other(err.to_string())
        }
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Errors raised while binding values into a form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("field {field} is not part of the {kind} form")]
    UnboundField { kind: EntityKind, field: Field },
    #[error("field {0} does not hold a list of values")]
    NotAnArray(Field),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
}

pub type FormResult<T> = std::result::Result<T, FormError>;

/// Errors raised while resolving configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid gateway URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid request timeout: {0}")]
    InvalidTimeout(String),
    #[error("invalid form clear policy: {0} (expected 'optimistic' or 'on-success')")]
    InvalidClearPolicy(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_three_way_messages() {
        assert_eq!(
            GatewayError::Unreachable.to_string(),
            "Could not connect to REST server. Please check your configuration details"
        );
        assert_eq!(
            GatewayError::NotFound.to_string(),
            "404 - Could not find API route. Please check your available APIs."
        );
        assert_eq!(
            GatewayError::Other("500 - Internal Server Error".into()).to_string(),
            "500 - Internal Server Error"
        );
    }
}
