use crate::error::{AuthError, AuthErrorExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tessera_domain::session::{Credentials, Identity};
use tessera_http::{ApiError, HttpResponse};

#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub tenant_id: &'a str,
}

#[derive(Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub tenant_id: &'a str,
}

#[derive(Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Login and registration response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub tokens: Credentials,
    pub user: Identity,
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("tenant_id", &self.tenant_id)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RegisterRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("tenant_id", &self.tenant_id)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RefreshRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshRequest").finish_non_exhaustive()
    }
}

/// Decodes an auth endpoint response.
///
/// Auth endpoints answer with a bare payload, but a `{ "data": .. }` envelope is accepted as
/// well. Failure statuses become [`AuthError::Api`].
pub(crate) fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, AuthError> {
    if !response.is_success() {
        return Err(AuthError::Api { source: ApiError::from_response(response), context: None });
    }

    let value: Value =
        serde_json::from_slice(&response.body).context("Auth response is not JSON")?;

    match serde_json::from_value::<T>(value.clone()) {
        Ok(payload) => Ok(payload),
        Err(err) => match value.get("data") {
            Some(data) => serde_json::from_value(data.clone()).context("Auth envelope payload"),
            None => Err(err).context("Auth response payload"),
        },
    }
}
