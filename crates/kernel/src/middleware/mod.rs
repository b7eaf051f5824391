//! HTTP middleware components.

pub mod bearer_auth;
pub mod language;

pub use bearer_auth::{RequestSession, attach_session};
pub use language::{ResolvedLanguage, negotiate_language};
