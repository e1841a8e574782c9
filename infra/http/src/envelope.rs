use crate::error::HttpError;
use crate::request::HttpResponse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field name to validation messages, as reported by the backend.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Standard success payload: `{ "data": T, "message"?: string, "metadata"?: object }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload; a body without `data` decodes it from `null`, so use `Option<_>` or `()` when
    /// the endpoint may omit it.
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl<T> Envelope<T> {
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { data, message: None, metadata: None }
    }

    #[must_use]
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parses a response into an envelope.
    ///
    /// Non-2xx responses become an [`ApiError`] via [`ApiError::from_response`]. Every
    /// envelope field is optional on the wire: an empty success body, or an object without
    /// `data`, decodes as if `data` were `null`, which suits `T = ()` or `Option<_>`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for failure statuses or a body that does not match `T`.
    pub fn decode(response: &HttpResponse) -> Result<Self, ApiError> {
        if !response.is_success() {
            return Err(ApiError::from_response(response));
        }

        let unexpected = |e: serde_json::Error| {
            ApiError::new(format!("Unexpected response payload: {e}")).with_status(response.status)
        };

        let mut body: Value = if response.body.is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_slice(&response.body).map_err(unexpected)?
        };
        if let Value::Object(fields) = &mut body {
            fields.entry("data").or_insert(Value::Null);
        }

        serde_json::from_value(body).map_err(unexpected)
    }
}

/// A normalized API failure, the single error shape surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
    pub errors: Option<FieldErrors>,
}

impl ApiError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), status: None, errors: None }
    }

    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Builds the error for a non-2xx response.
    ///
    /// The body's `message` (or `error`) becomes the message; otherwise a generic
    /// `Request failed with status N` is used. `errors` entries are normalized to lists of
    /// strings whatever their original shape.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let generic = || Self::new(format!("Request failed with status {}", response.status));

        let Ok(Value::Object(body)) = serde_json::from_slice::<Value>(&response.body) else {
            return generic().with_status(response.status);
        };

        let message = ["message", "error"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .filter(|m| !m.is_empty());

        let mut error = message.map_or_else(generic, Self::new).with_status(response.status);

        if let Some(Value::Object(fields)) = body.get("errors") {
            let normalized = fields
                .iter()
                .map(|(field, messages)| (field.clone(), normalize_messages(messages)))
                .collect();
            error = error.with_errors(normalized);
        }

        error
    }

    /// Wraps a transport failure; there is no status because nothing came back.
    #[must_use]
    pub fn from_transport(err: &HttpError) -> Self {
        let message = match err {
            HttpError::Connection { .. } => "Unable to reach the server",
            HttpError::Timeout { .. } => "The server did not respond in time",
            _ => "The request could not be completed",
        };
        Self::new(format!("{message}: {err}"))
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401))
    }

    /// Messages recorded against `field`, if any.
    #[must_use]
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors.as_ref().and_then(|e| e.get(field)).map_or(&[], Vec::as_slice)
    }
}

fn normalize_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_owned))
            .collect(),
        other => vec![other.to_string()],
    }
}
