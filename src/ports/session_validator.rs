//! Session validation port for bearer token validation.
//!
//! Provider-agnostic: implementations exist for OIDC issuers and for
//! tests. Anonymous requests never reach the validator.
//!
//! # Security Requirements
//!
//! All implementations MUST validate:
//! - **Issuer (iss)**: Token must come from the expected identity provider
//! - **Audience (aud)**: Token must be intended for this service
//! - **Expiry (exp)**: Token must not be expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, Principal};

/// Validates access tokens and extracts the principal.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed or badly signed tokens
/// - `AuthError::TokenExpired` for expired tokens
/// - `AuthError::ServiceUnavailable` for transient provider failures
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<Principal, AuthError>;
}
