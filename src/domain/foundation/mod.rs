//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, authentication types and error types
//! that form the vocabulary of the subscription domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, Principal};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{OwnerId, PlanId, PrincipalId, SubscriptionId};
pub use timestamp::Timestamp;
