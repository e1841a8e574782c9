use std::borrow::Cow;
use tessera_auth::AuthError;
use tessera_http::ApiError;

#[tessera_derive::tessera_error]
pub enum UserError {
    #[error("User request failed{}: {source}", format_context(.context))]
    Api { source: ApiError, context: Option<Cow<'static, str>> },

    #[error("Session error{}: {source}", format_context(.context))]
    Auth { source: AuthError, context: Option<Cow<'static, str>> },

    #[error("No signed-in user{}: {message}", format_context(.context))]
    NotAuthenticated { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid user id '{id}'")]
    InvalidId { id: String },

    #[error("Internal user error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
