//! # Domain Models
//!
//! Pure data shared across the workspace: session models, feature tags, configuration and
//! wire constants. Keep it lean: no I/O or networking here.

pub mod config;
pub mod constants;
pub mod features;
pub mod session;
