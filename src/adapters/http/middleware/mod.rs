//! HTTP middleware for axum.
//!
//! - `auth` - Bearer token validation and the principal extractor

pub mod auth;

pub use auth::{auth_middleware, AuthState, OptionalAuth};
