//! Existing-subscription guard for index, new and create.

use crate::domain::subscription::SubscriptionError;
use crate::ports::SubscriptionRepository;

use super::{OwnerContext, Redirect, SubscriptionPaths};

/// Redirects to the show page when the owner named in the request already
/// holds a subscription. Unscoped requests pass through.
pub(crate) async fn existing_subscription_redirect(
    repository: &dyn SubscriptionRepository,
    paths: &SubscriptionPaths,
    context: &OwnerContext,
) -> Result<Option<Redirect>, SubscriptionError> {
    let Some(owner) = context.scoped_owner() else {
        return Ok(None);
    };

    Ok(repository
        .find_by_owner(owner.id)
        .await?
        .map(|existing| Redirect::to(paths.show(owner, existing.id))))
}
