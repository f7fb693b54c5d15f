//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `mock` - Fixed token table, no external services
//! - `oidc` - JWT validation against an OIDC issuer's JWKS

mod mock;
mod oidc;

pub use mock::MockSessionValidator;
pub use oidc::{OidcConfig, OidcSessionValidator};
