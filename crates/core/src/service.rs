//! Service boundary to the ledger REST gateway.
//!
//! [`EntityService`] is what controllers depend on; [`RestService`] implements it with one
//! HTTP request per call against `<base>/<Entity>` and `<base>/<Entity>/<id>`. Every failure
//! leaves this module already classified as a [`GatewayError`].

use crate::config::GatewayConfig;
use crate::entity::EntityKind;
use crate::{ConfigResult, GatewayError, GatewayResult};
use reqwest::{Method, Response, StatusCode, Url};
use serde_json::Value;

/// CRUD access to one REST resource collection.
///
/// Each call issues exactly one request and resolves once; there is no retry, batching or
/// streaming.
#[allow(async_fn_in_trait)]
pub trait EntityService {
    async fn get_all(&self) -> GatewayResult<Vec<Value>>;
    async fn get(&self, id: &str) -> GatewayResult<Value>;
    async fn add(&self, record: &Value) -> GatewayResult<Value>;
    async fn update(&self, id: &str, record: &Value) -> GatewayResult<Value>;
    async fn delete(&self, id: &str) -> GatewayResult<()>;
}

/// Entry point to the gateway: one shared HTTP client, one [`RestService`] per entity.
#[derive(Clone, Debug)]
pub struct Gateway {
    client: reqwest::Client,
    base_url: Url,
}

impl Gateway {
    pub fn new(config: &GatewayConfig) -> ConfigResult<Self> {
        Ok(Self {
            client: config.http_client()?,
            base_url: config.base_url().clone(),
        })
    }

    pub fn service(&self, kind: EntityKind) -> RestService {
        RestService {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            kind,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RestService {
    client: reqwest::Client,
    base_url: Url,
    kind: EntityKind,
}

impl RestService {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Collection URL, or the record URL when `id` is given. The id is percent-encoded as a
    /// single path segment.
    ///
    /// Blank ids and the dot segments `.` and `..` are rejected: URL normalisation would turn
    /// them into the collection URL.
    fn url(&self, id: Option<&str>) -> GatewayResult<Url> {
        if let Some(id) = id {
            if matches!(id.trim(), "" | "." | "..") {
                return Err(GatewayError::Other(format!("invalid {} id: '{id}'", self.kind)));
            }
        }
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                GatewayError::Other(format!("gateway URL cannot carry a path: {}", self.base_url))
            })?;
            segments.pop_if_empty().push(self.kind.resource());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        id: Option<&str>,
        body: Option<&Value>,
    ) -> GatewayResult<Response> {
        let url = self.url(id)?;
        tracing::debug!(method = %method, url = %url, "gateway request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        check_status(response).await
    }
}

impl EntityService for RestService {
    async fn get_all(&self) -> GatewayResult<Vec<Value>> {
        let response = self.send(Method::GET, None, None).await?;
        match decode_body(response).await? {
            Value::Array(items) => Ok(items),
            other => Err(GatewayError::Other(format!(
                "expected a list of {} records, got: {other}",
                self.kind
            ))),
        }
    }

    async fn get(&self, id: &str) -> GatewayResult<Value> {
        let response = self.send(Method::GET, Some(id), None).await?;
        decode_body(response).await
    }

    async fn add(&self, record: &Value) -> GatewayResult<Value> {
        let response = self.send(Method::POST, None, Some(record)).await?;
        decode_body(response).await
    }

    async fn update(&self, id: &str, record: &Value) -> GatewayResult<Value> {
        let response = self.send(Method::PUT, Some(id), Some(record)).await?;
        decode_body(response).await
    }

    async fn delete(&self, id: &str) -> GatewayResult<()> {
        self.send(Method::DELETE, Some(id), None).await?;
        Ok(())
    }
}

/// Map a non-success status to the error taxonomy.
///
/// A 404 is `NotFound`. Other statuses carry the gateway's `error.message` when the body has
/// one, otherwise `"<code> - <reason>"`.
async fn check_status(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound);
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => {
            tracing::debug!(status = %status, error = %err, "could not read error body");
            String::new()
        }
    };
    Err(GatewayError::Other(error_message(status, &body)))
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "{} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            )
        })
}

/// Decode a JSON body; an empty body decodes to `null`.
async fn decode_body(response: Response) -> GatewayResult<Value> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| GatewayError::Other(format!("invalid response body: {e}")))
}
