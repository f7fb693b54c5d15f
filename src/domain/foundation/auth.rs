//! Authentication types for the domain layer.
//!
//! A [`Principal`] is the authenticated actor behind a request. It carries no
//! provider-specific data; any OIDC provider can populate it through the
//! `SessionValidator` port.
//!
//! ```ignore
//! // In HTTP middleware, after JWT validation:
//! let principal = Principal::new(PrincipalId::new("user-123")?, "user@example.com", None);
//! request.extensions_mut().insert(principal);
//! ```

use super::PrincipalId;
use thiserror::Error;

/// Authenticated actor extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The unique subject identifier from the auth provider.
    pub id: PrincipalId,

    /// Email address from the token claims.
    pub email: String,

    /// Display name if available.
    pub display_name: Option<String>,
}

impl Principal {
    /// Creates a new principal.
    pub fn new(id: PrincipalId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
        }
    }

    /// Returns the display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
