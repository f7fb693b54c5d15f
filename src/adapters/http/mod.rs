//! HTTP adapters - REST API implementations.

pub mod middleware;
pub mod subscriptions;

pub use middleware::{auth_middleware, AuthState, OptionalAuth};
pub use subscriptions::{subscription_router, SubscriptionAppState, SubscriptionSettings};
