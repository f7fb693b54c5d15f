//! HTTP DTOs for subscription endpoints.
//!
//! Every action answers with either a redirect or a rendered view. Both are
//! JSON: a redirect carries its location and flash, a render names the view
//! and carries the data the template would receive. Card tokens never leave
//! the service.

use serde::{Deserialize, Serialize};

use crate::application::handlers::subscription::{
    EditBody, Flash, IndexBody, NewBody, Redirect, ShowBody, View,
};
use crate::domain::plan::Plan;
use crate::domain::subscription::{Subscription, SubscriptionDraft, SubscriptionStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string of the `new` action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSubscriptionParams {
    /// Plan id or external plan id.
    #[serde(default)]
    pub plan: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of a `303 See Other` response.
#[derive(Debug, Clone, Serialize)]
pub struct RedirectResponse {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

impl From<&Redirect> for RedirectResponse {
    fn from(redirect: &Redirect) -> Self {
        Self {
            location: redirect.location.clone(),
            flash: redirect.flash.clone(),
        }
    }
}

/// Body of a rendered view.
#[derive(Debug, Clone, Serialize)]
pub struct ViewResponse<T> {
    pub view: View,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResponse {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub display_order: i32,
    pub stripe_id: String,
    pub free: bool,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            free: plan.is_free(),
            id: plan.id.value(),
            name: plan.name,
            price_cents: plan.price_cents,
            display_order: plan.display_order,
            stripe_id: plan.stripe_id,
        }
    }
}

/// A persisted subscription, or an unsaved draft (no id, no status).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub owner_id: i64,
    pub plan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SubscriptionStatus>,
    pub stripe_id: Option<String>,
    pub current_price: Option<i64>,
    pub card_type: Option<String>,
    pub last_four: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: Some(subscription.id.value()),
            owner_id: subscription.owner_id.value(),
            plan_id: subscription.plan_id.map(|id| id.value()),
            status: Some(subscription.status()),
            stripe_id: subscription.billing.stripe_id,
            current_price: subscription.billing.current_price,
            card_type: subscription.billing.card_type,
            last_four: subscription.billing.last_four,
            created_at: Some(subscription.created_at.to_rfc3339()),
            updated_at: Some(subscription.updated_at.to_rfc3339()),
        }
    }
}

impl From<SubscriptionDraft> for SubscriptionResponse {
    fn from(draft: SubscriptionDraft) -> Self {
        Self {
            id: None,
            owner_id: draft.owner_id.value(),
            plan_id: draft.plan_id.map(|id| id.value()),
            status: None,
            stripe_id: draft.billing.stripe_id,
            current_price: draft.billing.current_price,
            card_type: draft.billing.card_type,
            last_four: draft.billing.last_four,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Pricing page.
#[derive(Debug, Clone, Serialize)]
pub struct IndexResponse {
    pub plans: Vec<PlanResponse>,
    pub subscription: Option<SubscriptionResponse>,
}

impl From<IndexBody> for IndexResponse {
    fn from(body: IndexBody) -> Self {
        Self {
            plans: body.plans.into_iter().map(PlanResponse::from).collect(),
            subscription: body.subscription.map(SubscriptionResponse::from),
        }
    }
}

/// Subscribe form.
#[derive(Debug, Clone, Serialize)]
pub struct NewResponse {
    pub subscription: SubscriptionResponse,
    pub plan: Option<PlanResponse>,
}

impl From<NewBody> for NewResponse {
    fn from(body: NewBody) -> Self {
        Self {
            subscription: body.subscription.into(),
            plan: body.plan.map(PlanResponse::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowResponse {
    pub subscription: SubscriptionResponse,
}

impl From<ShowBody> for ShowResponse {
    fn from(body: ShowBody) -> Self {
        Self {
            subscription: body.subscription.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EditResponse {
    pub subscription: SubscriptionResponse,
    pub plans: Vec<PlanResponse>,
}

impl From<EditBody> for EditResponse {
    fn from(body: EditBody) -> Self {
        Self {
            subscription: body.subscription.into(),
            plans: body.plans.into_iter().map(PlanResponse::from).collect(),
        }
    }
}

/// Standard error response format.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// View to render, when the error has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<View>,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            view: None,
            details: None,
        }
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.view = Some(view);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
