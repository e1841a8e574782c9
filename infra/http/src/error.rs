use std::borrow::Cow;

/// Transport-level failures: the exchange did not produce an HTTP response.
#[tessera_derive::tessera_error]
pub enum HttpError {
    /// The server could not be reached.
    #[error("Connection failed{}: {message}", format_context(.context))]
    Connection { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The transport gave up waiting for a response.
    #[error("Request timed out{}: {message}", format_context(.context))]
    Timeout { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("HTTP client error{}: {source}", format_context(.context))]
    Client { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid request{}: {message}", format_context(.context))]
    InvalidRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Malformed payload{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal HTTP error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl HttpError {
    /// Classifies a `reqwest` failure so callers can tell connectivity apart from bugs.
    pub(crate) fn from_reqwest(err: reqwest::Error, context: Cow<'static, str>) -> Self {
        if err.is_timeout() {
            Self::Timeout { message: err.to_string().into(), context: Some(context) }
        } else if err.is_connect() {
            Self::Connection { message: err.to_string().into(), context: Some(context) }
        } else {
            Self::Client { source: err, context: Some(context) }
        }
    }
}
