//! Submitted subscription attributes.
//!
//! Form and JSON bodies arrive as loose key/value maps nested under a
//! `subscription` key. Only the attributes below may be assigned; anything
//! else is either dropped or rejected depending on [`ParamPolicy`].

use serde_json::{Map, Value};

use crate::domain::foundation::{PlanId, ValidationError};

use super::aggregate::BillingDetails;

/// Attribute names that may be mass-assigned onto a subscription.
pub const PERMITTED_ATTRIBUTES: [&str; 6] = [
    "plan_id",
    "stripe_id",
    "current_price",
    "credit_card_token",
    "card_type",
    "last_four",
];

const ROOT_KEY: &str = "subscription";

/// How unknown attributes in a submission are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamPolicy {
    /// Drop anything outside the permitted set.
    #[default]
    Strict,
    /// Hand attributes through unfiltered; assigning an unknown one fails.
    PassThrough,
}

/// Filtered attributes ready to be applied to a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionParams {
    pub plan_id: Option<PlanId>,
    pub stripe_id: Option<String>,
    pub current_price: Option<i64>,
    pub credit_card_token: Option<String>,
    pub card_type: Option<String>,
    pub last_four: Option<String>,
}

impl SubscriptionParams {
    /// Extracts attributes from a request body shaped
    /// `{ "subscription": { ... } }`.
    pub fn from_body(body: &Value, policy: ParamPolicy) -> Result<Self, ValidationError> {
        let attributes = body
            .get(ROOT_KEY)
            .and_then(Value::as_object)
            .ok_or_else(|| ValidationError::empty_field(ROOT_KEY))?;
        Self::from_attributes(attributes, policy)
    }

    /// Extracts attributes from an already-unwrapped map.
    pub fn from_attributes(
        attributes: &Map<String, Value>,
        policy: ParamPolicy,
    ) -> Result<Self, ValidationError> {
        let mut params = Self::default();

        for (key, value) in attributes {
            match key.as_str() {
                "plan_id" => params.plan_id = integer(key, value)?.map(PlanId::new),
                "stripe_id" => params.stripe_id = text(key, value)?,
                "current_price" => params.current_price = integer(key, value)?,
                "credit_card_token" => params.credit_card_token = text(key, value)?,
                "card_type" => params.card_type = text(key, value)?,
                "last_four" => params.last_four = text(key, value)?,
                other => match policy {
                    ParamPolicy::Strict => {
                        tracing::debug!(attribute = other, "Dropping unpermitted attribute");
                    }
                    ParamPolicy::PassThrough => {
                        return Err(ValidationError::unpermitted(other));
                    }
                },
            }
        }

        Ok(params)
    }

    /// Overwrites the fields that were submitted, leaving others untouched.
    pub(crate) fn apply_to(self, plan_id: &mut Option<PlanId>, billing: &mut BillingDetails) {
        if self.plan_id.is_some() {
            *plan_id = self.plan_id;
        }
        if self.stripe_id.is_some() {
            billing.stripe_id = self.stripe_id;
        }
        if self.current_price.is_some() {
            billing.current_price = self.current_price;
        }
        if self.credit_card_token.is_some() {
            billing.credit_card_token = self.credit_card_token;
        }
        if self.card_type.is_some() {
            billing.card_type = self.card_type;
        }
        if self.last_four.is_some() {
            billing.last_four = self.last_four;
        }
    }
}

/// Accepts JSON numbers and numeric strings (HTML forms submit strings).
/// Blank strings and null count as absent.
fn integer(field: &str, value: &Value) -> Result<Option<i64>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ValidationError::invalid_format(field, "must be an integer")),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ValidationError::invalid_format(field, "must be an integer")),
        _ => Err(ValidationError::invalid_format(field, "must be an integer")),
    }
}

fn text(field: &str, value: &Value) -> Result<Option<String>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(ValidationError::invalid_format(field, "must be a string")),
    }
}
