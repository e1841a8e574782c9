use std::borrow::Cow;
use tessera_http::{ApiError, HttpError};
use tessera_kernel::StoreError;

#[tessera_derive::tessera_error]
pub enum AuthError {
    /// The server answered with a failure status.
    #[error("Authentication request rejected{}: {source}", format_context(.context))]
    Api { source: ApiError, context: Option<Cow<'static, str>> },

    /// No response came back.
    #[error("Authentication transport error{}: {source}", format_context(.context))]
    Transport { source: HttpError, context: Option<Cow<'static, str>> },

    #[error("Malformed authentication payload{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Credentials could not be renewed; the session is left as it was.
    #[error("Session refresh failed{}: {message}", format_context(.context))]
    Refresh { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Not authenticated{}: {message}", format_context(.context))]
    NotAuthenticated { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Session persistence error{}: {source}", format_context(.context))]
    Store { source: StoreError, context: Option<Cow<'static, str>> },

    #[error("Internal auth error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl AuthError {
    /// The API failure behind this error, if the server produced one.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { source, .. } => Some(source),
            _ => None,
        }
    }
}
