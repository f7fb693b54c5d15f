//! OIDC adapter for JWT validation.
//!
//! Implements the `SessionValidator` port against any OIDC issuer that
//! publishes a JWKS document. Validation:
//!
//! 1. Fetch JWKS from the issuer's well-known endpoint (cached)
//! 2. Verify the JWT signature against the matching key
//! 3. Validate issuer, audience, and expiry claims
//! 4. Map claims to the domain `Principal`

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, TokenData, Validation,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::foundation::{AuthError, Principal, PrincipalId};
use crate::ports::SessionValidator;

const DEFAULT_JWKS_CACHE: Duration = Duration::from_secs(3600);

/// Configuration for the OIDC adapter.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Issuer URL, used for JWKS discovery and `iss` validation.
    pub issuer_url: String,

    /// Audience tokens must carry.
    pub audience: String,

    /// How long fetched keys stay cached. Defaults to one hour.
    pub jwks_cache_duration: Option<Duration>,
}

impl OidcConfig {
    pub fn new(issuer_url: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            audience: audience.into(),
            jwks_cache_duration: None,
        }
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = Some(duration);
        self
    }

    fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OidcClaims {
    sub: String,

    iss: String,

    #[serde(default)]
    aud: Audience,

    exp: i64,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    preferred_username: Option<String>,
}

/// Audience can be a single string or array of strings in JWTs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
    cache_duration: Duration,
}

impl JwksCache {
    fn new(jwks: JwkSet, cache_duration: Duration) -> Self {
        Self {
            jwks,
            fetched_at: Instant::now(),
            cache_duration,
        }
    }

    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > self.cache_duration
    }
}

/// Production `SessionValidator`.
///
/// Keys are fetched lazily on first validation so startup never blocks on
/// the identity provider.
pub struct OidcSessionValidator {
    config: OidcConfig,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl OidcSessionValidator {
    pub fn new(config: OidcConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            config,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let url = self.config.jwks_url();
        tracing::debug!(%url, "Fetching JWKS");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch JWKS");
            AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, "JWKS endpoint returned an error");
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse JWKS");
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })?;

        tracing::debug!(keys = jwks.keys.len(), "Fetched JWKS");
        Ok(jwks)
    }

    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if !cached.is_expired() {
                    return Ok(cached.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;

        let mut cache = self.jwks_cache.write().await;
        let duration = self.config.jwks_cache_duration.unwrap_or(DEFAULT_JWKS_CACHE);
        *cache = Some(JwksCache::new(jwks.clone(), duration));

        Ok(jwks)
    }

    fn find_decoding_key(
        &self,
        header: &jsonwebtoken::Header,
        jwks: &JwkSet,
    ) -> Result<(DecodingKey, Algorithm), AuthError> {
        let kid = header.kid.as_ref().ok_or_else(|| {
            tracing::warn!("JWT missing 'kid' header");
            AuthError::InvalidToken
        })?;

        let jwk = jwks.find(kid).ok_or_else(|| {
            tracing::warn!(%kid, "No matching key found");
            AuthError::InvalidToken
        })?;

        use jsonwebtoken::jwk::KeyAlgorithm;
        let algorithm = match jwk.common.key_algorithm {
            Some(KeyAlgorithm::RS256) | None => Algorithm::RS256,
            Some(KeyAlgorithm::RS384) => Algorithm::RS384,
            Some(KeyAlgorithm::RS512) => Algorithm::RS512,
            Some(KeyAlgorithm::ES256) => Algorithm::ES256,
            Some(KeyAlgorithm::ES384) => Algorithm::ES384,
            Some(other) => {
                tracing::warn!(algorithm = ?other, "Unsupported algorithm");
                return Err(AuthError::InvalidToken);
            }
        };

        let decoding_key = DecodingKey::from_jwk(jwk).map_err(|e| {
            tracing::warn!(error = %e, "Failed to create decoding key");
            AuthError::InvalidToken
        })?;

        Ok((decoding_key, algorithm))
    }

    fn validate_token(
        &self,
        token: &str,
        decoding_key: &DecodingKey,
        algorithm: Algorithm,
    ) -> Result<TokenData<OidcClaims>, AuthError> {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.config.issuer_url]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<OidcClaims>(token, decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::warn!(error = %e, "Token validation failed");
                    AuthError::InvalidToken
                }
            }
        })
    }
}

#[async_trait]
impl SessionValidator for OidcSessionValidator {
    async fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Failed to decode JWT header");
            AuthError::InvalidToken
        })?;

        let jwks = self.get_jwks().await?;
        let (decoding_key, algorithm) = self.find_decoding_key(&header, &jwks)?;
        let claims = self.validate_token(token, &decoding_key, algorithm)?.claims;

        if claims.iss != self.config.issuer_url || !claims.aud.contains(&self.config.audience) {
            tracing::warn!(iss = %claims.iss, "Issuer or audience mismatch after validation");
            return Err(AuthError::InvalidToken);
        }

        let email = claims.email.ok_or_else(|| {
            tracing::warn!("Token missing email claim");
            AuthError::InvalidToken
        })?;

        let principal_id = PrincipalId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Token has an empty subject");
            AuthError::InvalidToken
        })?;

        Ok(Principal::new(
            principal_id,
            email,
            claims.name.or(claims.preferred_username),
        ))
    }
}

impl std::fmt::Debug for OidcSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcSessionValidator")
            .field("issuer_url", &self.config.issuer_url)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn config_builds_jwks_url() {
        let config = OidcConfig::new("https://auth.example.com/", "billing-api");
        assert_eq!(
            config.jwks_url(),
            "https://auth.example.com/.well-known/jwks.json"
        );
    }

    #[test]
    fn config_with_custom_cache_duration() {
        let config = OidcConfig::new("https://auth.example.com", "billing-api")
            .with_cache_duration(Duration::from_secs(300));
        assert_eq!(config.jwks_cache_duration, Some(Duration::from_secs(300)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Audience
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn audience_variants_contain_expected_values() {
        assert!(Audience::Single("api".to_string()).contains("api"));
        assert!(Audience::Multiple(vec!["a".to_string(), "api".to_string()]).contains("api"));
        assert!(!Audience::None.contains("api"));
    }

    #[test]
    fn audience_deserializes_string_or_array() {
        let single: Audience = serde_json::from_str("\"api\"").unwrap();
        let multiple: Audience = serde_json::from_str("[\"a\",\"api\"]").unwrap();
        assert!(single.contains("api"));
        assert!(multiple.contains("api"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // JWKS cache
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn jwks_cache_expires_after_duration() {
        let fresh = JwksCache::new(JwkSet { keys: vec![] }, Duration::from_secs(3600));
        assert!(!fresh.is_expired());

        let stale = JwksCache::new(JwkSet { keys: vec![] }, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(stale.is_expired());
    }

    #[tokio::test]
    async fn malformed_token_is_rejected_before_fetching_keys() {
        let validator =
            OidcSessionValidator::new(OidcConfig::new("http://127.0.0.1:9", "billing-api"))
                .unwrap();

        let result = validator.validate("not-a-jwt").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OidcSessionValidator>();
    }
}
