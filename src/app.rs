//! Application assembly.
//!
//! Picks adapters from configuration and wraps the subscription router in
//! the HTTP middleware stack. Every wiring error surfaces at startup.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::auth::{MockSessionValidator, OidcConfig, OidcSessionValidator};
use crate::adapters::http::{
    auth_middleware, subscription_router, AuthState, SubscriptionAppState, SubscriptionSettings,
};
use crate::adapters::memory::{
    InMemoryOwnerDirectory, InMemoryPlanCatalog, InMemorySubscriptionRepository, SeedData,
};
use crate::adapters::owner::{default_accessor_registry, OwnerRecordCustomerResolver};
use crate::adapters::postgres::{
    PostgresOwnerDirectory, PostgresPlanReader, PostgresSubscriptionRepository,
};
use crate::adapters::signup::RegistrationPathFlow;
use crate::application::handlers::subscription::SubscriptionPaths;
use crate::config::{AppConfig, DatabaseConfig, ServerConfig, ValidationError};
use crate::domain::foundation::DomainError;
use crate::domain::owner::OwnerKind;
use crate::ports::{OwnerDirectory, PlanReader, SignUpFlow, SubscriptionRepository};

/// Errors raised while assembling the application.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Seed data rejected: {0}")]
    Seed(#[from] DomainError),

    #[error("Invalid mount path: {0}")]
    MountPath(#[from] url::ParseError),

    #[error("Unknown current-owner accessor '{name}' (available: {available})")]
    UnknownAccessor { name: String, available: String },

    #[error("Identity provider client failed: {0}")]
    IdentityProvider(#[from] reqwest::Error),
}

/// Storage adapters for one deployment.
struct Storage {
    owners: Arc<dyn OwnerDirectory>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanReader>,
}

/// Builds the subscription state from configuration.
pub async fn build_state(config: &AppConfig) -> Result<SubscriptionAppState, StartupError> {
    let subscriptions = &config.subscriptions;
    let kind = subscriptions.owner_kind()?;

    let storage = match &config.database {
        Some(database) => postgres_storage(database, kind, config.features.slug_lookup).await?,
        None => memory_storage(config, kind)?,
    };

    let accessor_name = subscriptions.accessor_name()?;
    let registry = default_accessor_registry(storage.owners.clone());
    let current_owner =
        registry
            .resolve(&accessor_name)
            .ok_or_else(|| StartupError::UnknownAccessor {
                available: registry.names().join(", "),
                name: accessor_name.clone(),
            })?;

    let sign_up_scope = subscriptions.sign_up_scope()?;
    let sign_up_flow: Option<Arc<dyn SignUpFlow>> = if config.features.sign_up_flow {
        Some(Arc::new(RegistrationPathFlow::new(
            subscriptions.registration_path_template.clone(),
            sign_up_scope.clone(),
        )))
    } else {
        None
    };

    tracing::info!(
        owner_kind = %kind,
        accessor = %accessor_name,
        sign_up = sign_up_flow.is_some(),
        strict_params = config.features.strict_params,
        "Subscription state assembled"
    );

    Ok(SubscriptionAppState {
        owner_directory: storage.owners,
        current_owner,
        billing_customers: Arc::new(OwnerRecordCustomerResolver),
        subscription_repository: storage.subscriptions,
        plan_reader: storage.plans,
        sign_up_flow,
        settings: SubscriptionSettings {
            paths: SubscriptionPaths::new(&subscriptions.mount_path)?
                .with_after_create(subscriptions.after_create_path.clone()),
            param_policy: config.features.param_policy(),
            sign_up_scope,
            new_subscription_notice: subscriptions.new_subscription_notice.clone(),
        },
    })
}

async fn postgres_storage(
    database: &DatabaseConfig,
    kind: OwnerKind,
    slug_lookup: bool,
) -> Result<Storage, StartupError> {
    let pool: PgPool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(Some(database.idle_timeout()))
        .max_lifetime(Some(database.max_lifetime()))
        .connect(database.url.expose_secret())
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Storage {
        owners: Arc::new(
            PostgresOwnerDirectory::new(pool.clone(), kind).with_slug_lookup(slug_lookup),
        ),
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        plans: Arc::new(PostgresPlanReader::new(pool)),
    })
}

fn memory_storage(config: &AppConfig, kind: OwnerKind) -> Result<Storage, StartupError> {
    let seed = match &config.subscriptions.seed_path {
        Some(path) => SeedData::from_yaml_file(path)?,
        None => {
            tracing::warn!("No database or seed file configured; starting with empty storage");
            SeedData::default()
        }
    };

    let owners = InMemoryOwnerDirectory::new(kind)
        .with_slug_lookup(config.features.slug_lookup)
        .with_owners(seed.owners(kind)?);
    let plans = InMemoryPlanCatalog::new(seed.plans)?;

    Ok(Storage {
        owners: Arc::new(owners),
        subscriptions: Arc::new(InMemorySubscriptionRepository::new()),
        plans: Arc::new(plans),
    })
}

/// Session validator for the configured identity provider.
///
/// Without an auth section every bearer token is rejected and requests
/// proceed anonymously.
pub fn build_validator(config: &AppConfig) -> Result<AuthState, StartupError> {
    match &config.auth {
        Some(auth) => {
            let oidc = OidcConfig::new(auth.issuer.clone(), auth.audience.clone())
                .with_cache_duration(auth.jwks_cache_ttl());
            Ok(Arc::new(OidcSessionValidator::new(oidc)?))
        }
        None => {
            tracing::warn!("No identity provider configured; all requests are anonymous");
            Ok(Arc::new(MockSessionValidator::new()))
        }
    }
}

/// Wraps the subscription router with auth, tracing, timeout, CORS and
/// request-id layers.
pub fn router(state: SubscriptionAppState, validator: AuthState, server: &ServerConfig) -> Router {
    let mount = state.settings.paths.mount().to_string();

    subscription_router(&mount)
        .with_state(state)
        .layer(axum::middleware::from_fn_with_state(validator, auth_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(server))
                .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs))),
        )
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(AllowOrigin::list(origins))
}
