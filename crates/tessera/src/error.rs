use std::borrow::Cow;
use tessera_auth::AuthError;
use tessera_http::HttpError;
use tessera_kernel::RegistryError;
use tessera_storage::StorageError;

/// Start-up failures. Any of them means the application must not run.
#[tessera_derive::tessera_error]
pub enum AppError {
    #[error("Module composition failed{}: {source}", format_context(.context))]
    Registry { source: RegistryError, context: Option<Cow<'static, str>> },

    #[error("Credential storage unavailable{}: {source}", format_context(.context))]
    Store { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("HTTP transport unavailable{}: {source}", format_context(.context))]
    Http { source: HttpError, context: Option<Cow<'static, str>> },

    #[error("Session setup failed{}: {source}", format_context(.context))]
    Auth { source: AuthError, context: Option<Cow<'static, str>> },

    #[error("Internal application error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
