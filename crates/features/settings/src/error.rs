use std::borrow::Cow;
use tessera_kernel::StoreError;

#[tessera_derive::tessera_error]
pub enum SettingsError {
    #[error("Settings storage error{}: {source}", format_context(.context))]
    Store { source: StoreError, context: Option<Cow<'static, str>> },

    #[error("Invalid settings{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal settings error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
