use crate::error::HttpError;
use crate::request::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use private::Sealed;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::borrow::Cow;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, trace};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Performs a single HTTP-like exchange.
///
/// Implementations return `Ok` for every response that reached the server, including error
/// statuses; `Err` is reserved for transport failures (no response at all). Timeouts and
/// cancellation are the implementation's own concern.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// `reqwest`-backed [`Transport`] addressing every request relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    #[must_use = "The transport is not created until you call .build()"]
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn headers_for(request: &HttpRequest) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::with_capacity(request.headers().len());
        for (name, value) in request.headers() {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                HttpError::InvalidRequest {
                    message: e.to_string().into(),
                    context: Some(format!("Header name '{name}'").into()),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| HttpError::InvalidRequest {
                message: e.to_string().into(),
                context: Some(format!("Header value for '{name}'").into()),
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = self.url_for(request.path());
        let method = reqwest::Method::from_bytes(request.method().as_ref().as_bytes())
            .map_err(|e| HttpError::InvalidRequest { message: e.to_string().into(), context: None })?;
        let context: Cow<'static, str> = format!("{} {}", request.method(), request.path()).into();

        let mut builder =
            self.client.request(method, &url).headers(Self::headers_for(&request)?);
        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body_bytes() {
            builder = builder.body(body.to_vec());
        }

        trace!(method = %request.method(), url = %url, "Dispatching request");

        let response =
            builder.send().await.map_err(|e| HttpError::from_reqwest(e, context.clone()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();
        let body =
            response.bytes().await.map_err(|e| HttpError::from_reqwest(e, context))?.to_vec();

        debug!(method = %request.method(), path = request.path(), status, "Response received");

        Ok(HttpResponse { status, headers, body })
    }
}

#[derive(Debug, Default)]
pub struct NoBaseUrl;
#[derive(Debug)]
pub struct WithBaseUrl(String);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoBaseUrl {}
impl Sealed for WithBaseUrl {}

/// Typestate builder for [`HttpTransport`]; a base URL is mandatory.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct HttpTransportBuilder<S: Sealed = NoBaseUrl> {
    state: S,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

#[allow(private_bounds)]
impl<S: Sealed> HttpTransportBuilder<S> {
    /// Per-request timeout. Defaults to 30 seconds.
    #[must_use = "Sets the request timeout"]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use = "Sets the User-Agent header"]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl HttpTransportBuilder<NoBaseUrl> {
    #[must_use = "Sets the base URL all request paths are relative to"]
    pub fn base_url(self, url: impl Into<String>) -> HttpTransportBuilder<WithBaseUrl> {
        HttpTransportBuilder {
            state: WithBaseUrl(url.into()),
            timeout: self.timeout,
            user_agent: self.user_agent,
        }
    }
}

impl HttpTransportBuilder<WithBaseUrl> {
    /// Builds the underlying `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] for a base URL that is not http(s), or
    /// [`HttpError::Client`] if the TLS backend cannot be initialized.
    pub fn build(self) -> Result<HttpTransport, HttpError> {
        let base_url = self.state.0.trim_end_matches('/').to_owned();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(HttpError::InvalidRequest {
                message: base_url.into(),
                context: Some("Base URL must start with http:// or https://".into()),
            });
        }

        let mut client = Client::builder().timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT));
        if let Some(agent) = self.user_agent {
            client = client.user_agent(agent);
        }
        let client = client.build().map_err(|e| HttpError::Client {
            source: e,
            context: Some("Building HTTP client".into()),
        })?;

        Ok(HttpTransport { client, base_url })
    }
}
