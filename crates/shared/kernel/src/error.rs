use crate::module::BoxError;
use std::borrow::Cow;

/// Failures of module registration, ordering and initialization.
#[tessera_derive::tessera_error]
pub enum RegistryError {
    #[error("Invalid module{}: {message}", format_context(.context))]
    InvalidModule { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Module '{unit}' is already registered")]
    DuplicateModule { unit: String },

    #[error("Module '{unit}' depends on '{dependency}', which is not registered")]
    MissingDependency { unit: String, dependency: String },

    /// Raised for the unit found still in progress when the traversal came back to it.
    #[error("Circular dependency detected at module '{unit}'")]
    CircularDependency { unit: String },

    #[error("Module '{unit}' failed to initialize{}: {source}", format_context(.context))]
    Initialization { unit: String, source: BoxError, context: Option<Cow<'static, str>> },

    #[error("Service '{service}' is not available in the module context")]
    MissingService { service: &'static str },

    #[error("Internal registry error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
