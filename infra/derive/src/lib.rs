#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! tessera-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Declares a crate-level error enum.
///
/// The macro turns a plain enum into a `thiserror` error with context support so every
/// crate reports failures the same way.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * A `<Name>Ext` trait with `.context(..)` for `Result<T, Name>`.
/// * For variants holding exactly `source` and `context`: `From<Source>` and
///   `.context(..)` on `Result<T, Source>`.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }` variant
///   exists.
/// * A module-private `format_context` helper used in display strings.
///
/// # Requirements
///
/// * Variants use named fields only.
/// * A `context` field is typed `Option<Cow<'static, str>>`.
/// * Variants wrapping a source error also carry a `context` field.
///
/// Declare one error enum per module, since `format_context` is emitted next to it.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[tessera_derive::tessera_error]
/// pub enum StoreError {
///     #[error("Store I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load() -> Result<String, StoreError> {
///     let raw = std::fs::read_to_string("session").context("Reading session file")?;
///     if raw.is_empty() {
///         return Err("Session file is empty".into());
///     }
///     Ok(raw)
/// }
/// ```
#[proc_macro_attribute]
pub fn tessera_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
