//! Mock session validator.
//!
//! Maps fixed tokens to principals. Used by tests and by local runs without
//! an identity provider.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, Principal, PrincipalId, ValidationError};
use crate::ports::SessionValidator;

/// Tokens not registered return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, Principal>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token for a principal.
    pub fn with_principal(self, token: impl Into<String>, principal: Principal) -> Self {
        self.add_token(token, principal);
        self
    }

    /// Registers a token for a principal built from an id.
    pub fn with_test_principal(
        self,
        token: impl Into<String>,
        principal_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let principal_id = principal_id.into();
        let principal = Principal::new(
            PrincipalId::new(principal_id.clone())?,
            format!("{}@test.example.com", principal_id),
            None,
        );
        Ok(self.with_principal(token, principal))
    }

    /// Forces every validation to fail with `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn add_token(&self, token: impl Into<String>, principal: Principal) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), principal);
    }

    pub fn token_count(&self) -> usize {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registered_token_returns_principal() {
        let validator = MockSessionValidator::new()
            .with_test_principal("token-1", "user-1")
            .unwrap();

        let principal = validator.validate("token-1").await.unwrap();

        assert_eq!(principal.id.as_str(), "user-1");
        assert_eq!(principal.email, "user-1@test.example.com");
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let validator = MockSessionValidator::new();
        assert!(matches!(
            validator.validate("nope").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn forced_error_wins() {
        let validator = MockSessionValidator::new()
            .with_test_principal("token-1", "user-1")
            .unwrap()
            .with_error(AuthError::service_unavailable("down"));

        assert!(matches!(
            validator.validate("token-1").await,
            Err(AuthError::ServiceUnavailable(_))
        ));
    }

    #[test]
    fn counts_tokens() {
        let validator = MockSessionValidator::new()
            .with_test_principal("a", "user-a")
            .unwrap()
            .with_test_principal("b", "user-b")
            .unwrap();
        assert_eq!(validator.token_count(), 2);
    }
}
