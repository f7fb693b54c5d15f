//! Subscription domain module.
//!
//! A subscription ties an owner to a plan plus the billing details the
//! payment form submitted.

mod aggregate;
mod errors;
mod params;
mod status;

pub use aggregate::{BillingDetails, Subscription, SubscriptionDraft};
pub use errors::SubscriptionError;
pub use params::{ParamPolicy, SubscriptionParams, PERMITTED_ATTRIBUTES};
pub use status::SubscriptionStatus;
