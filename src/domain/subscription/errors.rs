//! Subscription-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Unauthorized | 401 |
//! | SubscriptionNotFound | 404 |
//! | PlanNotFound | 404 |
//! | ValidationFailed | 422 |
//! | MisconfiguredDependency | 500 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, ValidationError};
use crate::domain::owner::AccessDenial;

/// Errors raised by subscription actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// The principal may not act on the requested owner. The denial reason
    /// is kept for logs and never shown to the user.
    #[error("You are not authorized to access this account")]
    Unauthorized(AccessDenial),

    /// No subscription with this id belongs to the resolved owner.
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(SubscriptionId),

    /// A referenced plan does not exist.
    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    /// Submitted attributes were rejected.
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// A required host capability is not configured.
    #[error("Required capability is not configured: {0}")]
    MisconfiguredDependency(String),

    /// Storage or collaborator failure.
    #[error("Error: {0}")]
    Infrastructure(String),
}

impl SubscriptionError {
    pub fn unauthorized(reason: AccessDenial) -> Self {
        SubscriptionError::Unauthorized(reason)
    }

    pub fn not_found(id: SubscriptionId) -> Self {
        SubscriptionError::SubscriptionNotFound(id)
    }

    pub fn plan_not_found(reference: impl Into<String>) -> Self {
        SubscriptionError::PlanNotFound(reference.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SubscriptionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn misconfigured(capability: impl Into<String>) -> Self {
        SubscriptionError::MisconfiguredDependency(capability.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SubscriptionError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::Unauthorized(_) => ErrorCode::Unauthorized,
            SubscriptionError::SubscriptionNotFound(_) => ErrorCode::SubscriptionNotFound,
            SubscriptionError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            SubscriptionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SubscriptionError::MisconfiguredDependency(_) => ErrorCode::InternalError,
            SubscriptionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<ValidationError> for SubscriptionError {
    fn from(err: ValidationError) -> Self {
        SubscriptionError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        if err.is_validation() {
            let field = err
                .details
                .get("field")
                .cloned()
                .unwrap_or_else(|| "base".to_string());
            return SubscriptionError::validation(field, err.message);
        }
        match err.code {
            ErrorCode::PlanNotFound => SubscriptionError::PlanNotFound(err.message),
            _ => SubscriptionError::Infrastructure(err.message),
        }
    }
}
