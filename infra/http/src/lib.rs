//! # HTTP
//!
//! The request transport capability consumed by the session core.
//!
//! * [`Transport`] performs exactly one exchange: a request in, a response (any status) or a
//!   transport-level failure out. No retries, no authentication.
//! * [`HttpTransport`] is the `reqwest` implementation used by applications.
//! * [`Envelope`] and [`ApiError`] implement the response parsing contract shared by every
//!   endpoint: `{data, message?, metadata?}` on success, `{message, errors?}` on failure.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tessera_http::{Envelope, HttpRequest, HttpTransport, Transport};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::builder().base_url("https://api.example.com").build()?;
//! let response = transport.send(HttpRequest::get("/health")).await?;
//! let envelope: Envelope<serde_json::Value> = Envelope::decode(&response)?;
//! # Ok(())
//! # }
//! ```

mod envelope;
mod error;
mod request;
mod transport;

pub use envelope::{ApiError, Envelope, FieldErrors};
pub use error::{HttpError, HttpErrorExt};
pub use request::{HttpRequest, HttpResponse, Method};
pub use transport::{HttpTransport, HttpTransportBuilder, Transport};
