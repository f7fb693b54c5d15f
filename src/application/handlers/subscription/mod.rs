//! Subscription handlers.
//!
//! Every request first resolves the owner it acts upon
//! ([`ResolveOwnerHandler`]); the action handlers then receive the
//! resulting [`OwnerContext`].
//!
//! ## Commands
//! - Creating a subscription
//! - Updating (plan switch, card details)
//! - Cancelling
//!
//! ## Queries
//! - Owner resolution and subscription loading
//! - Pricing page, subscribe form, show and edit pages

mod cancel_subscription;
mod create_subscription;
mod guard;
mod index;
mod list_plans;
mod load_subscription;
mod new_subscription;
mod outcome;
mod paths;
mod resolve_owner;
mod show_subscription;
mod update_subscription;

#[cfg(test)]
pub(crate) mod test_support;

pub use outcome::{messages, ActionOutcome, Flash, FlashKind, Redirect, Render, View};
pub use paths::SubscriptionPaths;
pub use resolve_owner::{OwnerContext, ResolveOwnerHandler, ResolveOwnerQuery};

// Commands
pub use cancel_subscription::{CancelSubscriptionCommand, CancelSubscriptionHandler};
pub use create_subscription::{CreateSubscriptionCommand, CreateSubscriptionHandler};
pub use update_subscription::{UpdateSubscriptionCommand, UpdateSubscriptionHandler};

// Queries
pub use index::{IndexBody, IndexSubscriptionsHandler, IndexSubscriptionsQuery};
pub use list_plans::{ListPlansHandler, ListPlansQuery};
pub use load_subscription::{LoadSubscriptionHandler, LoadSubscriptionQuery};
pub use new_subscription::{NewBody, NewSubscriptionHandler, NewSubscriptionQuery};
pub use show_subscription::{
    EditBody, EditSubscriptionHandler, ShowBody, ShowSubscriptionHandler, ShowSubscriptionQuery,
};
