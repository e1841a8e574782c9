use crate::session::SessionManager;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tessera_domain::constants::headers;
use tessera_http::{ApiError, Envelope, HttpRequest, HttpResponse, Transport};
use tessera_kernel::safe_nanoid;
use tracing::{debug, warn};

#[derive(Debug)]
struct ApiClientInner {
    transport: Arc<dyn Transport>,
    session: Option<SessionManager>,
}

/// Request pipeline wrapping every outbound call.
///
/// 1. Stamps `Authorization: Bearer <token>` and the tenant header from the attached session,
///    plus a fresh `x-request-id`.
/// 2. Dispatches through the transport.
/// 3. A `401` with a session attached triggers exactly one refresh. When it succeeds the
///    request is re-stamped and sent once more, and that outcome is final. When it fails the
///    session is logged out and the original `401` is returned.
///
/// Concurrent requests failing together each run their own refresh.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

impl ApiClient {
    /// A pipeline without a session: no credentials, no refresh.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { inner: Arc::new(ApiClientInner { transport, session: None }) }
    }

    #[must_use]
    pub fn with_session(transport: Arc<dyn Transport>, session: SessionManager) -> Self {
        Self { inner: Arc::new(ApiClientInner { transport, session: Some(session) }) }
    }

    #[must_use]
    pub fn session(&self) -> Option<&SessionManager> {
        self.inner.session.as_ref()
    }

    /// Runs `request` through the pipeline and returns the successful response.
    ///
    /// # Errors
    ///
    /// Any failure status or transport failure, normalized into an [`ApiError`].
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        request.set_header(headers::REQUEST_ID, safe_nanoid!());
        if request.header_value(headers::ACCEPT).is_none() {
            request.set_header(headers::ACCEPT, headers::JSON);
        }
        if let Some(session) = self.session() {
            session.authorize(&mut request);
        }

        let response = self.dispatch(request.clone()).await?;
        if response.is_success() {
            return Ok(response);
        }

        let original = ApiError::from_response(&response);
        let Some(session) = self.session().filter(|_| response.is_unauthorized()) else {
            return Err(original);
        };

        debug!(path = request.path(), "Access denied, refreshing credentials");
        if let Err(err) = session.refresh().await {
            warn!(path = request.path(), error = %err, "Refresh failed, ending session");
            session.end_locally().await;
            return Err(original);
        }

        session.authorize(&mut request);
        let retry = self.dispatch(request).await?;
        if retry.is_success() { Ok(retry) } else { Err(ApiError::from_response(&retry)) }
    }

    /// Sends `request` and decodes the success envelope.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send); a payload not matching `T` is an [`ApiError`] as well.
    pub async fn request<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<Envelope<T>, ApiError> {
        let response = self.send(request).await?;
        Envelope::decode(&response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, ApiError> {
        self.request(HttpRequest::get(path)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.request(with_body(HttpRequest::post(path), body)?).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.request(with_body(HttpRequest::put(path), body)?).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.request(with_body(HttpRequest::patch(path), body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, ApiError> {
        self.request(HttpRequest::delete(path)).await
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.inner.transport.send(request).await.map_err(|err| {
            warn!(error = %err, "Transport failure");
            ApiError::from_transport(&err)
        })
    }
}

fn with_body<B>(request: HttpRequest, body: &B) -> Result<HttpRequest, ApiError>
where
    B: Serialize + ?Sized,
{
    request.json(body).map_err(|err| ApiError::new(format!("Invalid request body: {err}")))
}
