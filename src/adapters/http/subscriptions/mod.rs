//! HTTP adapter for subscription endpoints.
//!
//! Exposes the subscription actions as JSON over REST. Redirects answer
//! `303 See Other` with the flash in the body; rendered views answer `200`
//! and name the view.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{SubscriptionApiError, SubscriptionAppState, SubscriptionSettings};
pub use routes::{subscription_router, subscription_routes};
