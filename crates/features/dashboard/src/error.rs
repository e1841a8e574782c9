use std::borrow::Cow;
use tessera_http::ApiError;

#[tessera_derive::tessera_error]
pub enum DashboardError {
    #[error("Dashboard request failed{}: {source}", format_context(.context))]
    Api { source: ApiError, context: Option<Cow<'static, str>> },

    #[error("Internal dashboard error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
