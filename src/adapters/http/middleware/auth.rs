//! Authentication middleware and extractor for axum.
//!
//! - `auth_middleware` - Validates Bearer tokens and injects the [`Principal`]
//! - `OptionalAuth` - Extractor yielding the principal when one was injected
//!
//! Subscription routes accept anonymous requests: the sign-up redirect in
//! `new` is reached without a session, and owner resolution denies access
//! on its own when no principal is present.
//!
//! ```text
//! Request → auth_middleware → injects Principal into extensions
//!                                      ↓
//!                              Handler → OptionalAuth extractor reads from extensions
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, Principal};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates `Authorization: Bearer <token>` when present.
///
/// A missing header continues anonymously. A rejected token ends the
/// request with 401, or 503 when the identity provider is unreachable.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token);

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(token).await {
        Ok(principal) => {
            tracing::debug!(principal = %principal.id, "Authenticated request");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => auth_error_response(&e),
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
}

fn auth_error_response(error: &AuthError) -> Response {
    let (status, message) = match error {
        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!("Auth service unavailable: {}", msg);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Authentication service unavailable",
            )
        }
    };

    (
        status,
        Json(serde_json::json!({
            "error": message,
            "code": "AUTH_ERROR"
        })),
    )
        .into_response()
}

/// Extractor for the optional principal.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Principal>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<Principal>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::domain::foundation::PrincipalId;
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn principal() -> Principal {
        Principal::new(
            PrincipalId::new("user-123").unwrap(),
            "owner@example.com",
            None,
        )
    }

    async fn whoami(OptionalAuth(principal): OptionalAuth) -> String {
        principal
            .map(|p| p.id.to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn app(validator: MockSessionValidator) -> Router {
        let state: AuthState = Arc::new(validator);
        Router::new()
            .route("/whoami", get(whoami))
            .layer(axum::middleware::from_fn_with_state(state, auth_middleware))
    }

    async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Middleware Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn valid_token_injects_principal() {
        let validator = MockSessionValidator::new().with_principal("good", principal());
        let (status, body) = call(app(validator), Some("Bearer good")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user-123");
    }

    #[tokio::test]
    async fn missing_header_continues_anonymously() {
        let (status, body) = call(app(MockSessionValidator::new()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let (status, _) = call(app(MockSessionValidator::new()), Some("Bearer nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn provider_outage_is_service_unavailable() {
        let validator =
            MockSessionValidator::new().with_error(AuthError::service_unavailable("jwks down"));
        let (status, _) = call(app(validator), Some("Bearer any")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Token Extraction Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer my-token"), Some("my-token"));
        assert_eq!(bearer_token("my-token"), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer   "), None);
    }
}
