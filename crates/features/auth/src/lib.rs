//! # Auth
//!
//! Owns the authenticated session and every request that carries it.
//!
//! * [`SessionManager`] is the single writer of identity and credentials. It talks to the
//!   `/auth/*` endpoints, persists the session into the credential store as four entries and
//!   notifies observers after each committed change.
//! * [`ApiClient`] is the request pipeline: it stamps credentials on outbound requests and,
//!   on a `401`, refreshes once and retries once.
//! * [`AuthModule`] is the feature unit restoring the persisted session at start-up.
//!
//! ```rust,ignore
//! let session = SessionManager::builder().transport(transport.clone()).store(store).build()?;
//! session.restore().await;
//!
//! let client = ApiClient::with_session(transport, session.clone());
//! let profile: Envelope<Profile> = client.get("/users/me").await?;
//! ```

mod client;
mod error;
mod listener;
mod payload;
mod session;
mod unit;

pub use client::ApiClient;
pub use error::{AuthError, AuthErrorExt};
pub use listener::{ListenerId, SessionListener};
pub use payload::{AuthPayload, LoginRequest, RefreshRequest, RegisterRequest};
pub use session::{SessionManager, SessionManagerBuilder};
pub use unit::AuthModule;
