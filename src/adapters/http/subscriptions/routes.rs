//! Axum router configuration for subscription endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    cancel, cancel_unscoped, create_for_owner, create_unscoped, edit, edit_unscoped, health,
    index_for_owner, index_unscoped, new_for_owner, new_unscoped, show, show_unscoped, update,
    update_unscoped, SubscriptionAppState,
};

/// Create the subscription routes, relative to the mount path.
///
/// # Routes
///
/// ## Owner-less (act on the principal's own owner)
/// - `GET /subscriptions` - Pricing page
/// - `GET /subscriptions/new` - Subscribe form or sign-up redirect
/// - `POST /subscriptions` - Subscribe
/// - `GET /subscriptions/:id`, `GET /subscriptions/:id/edit`
/// - `PUT|PATCH /subscriptions/:id`, `POST /subscriptions/:id/cancel`
///
/// ## Owner-scoped
/// - `GET /owners/:owner_id/subscriptions` - Pricing page
/// - `GET /owners/:owner_id/subscriptions/new` - Subscribe form
/// - `POST /owners/:owner_id/subscriptions` - Subscribe
/// - `GET /owners/:owner_id/subscriptions/:id` - Show
/// - `GET /owners/:owner_id/subscriptions/:id/edit` - Edit form
/// - `PUT|PATCH /owners/:owner_id/subscriptions/:id` - Update
/// - `POST /owners/:owner_id/subscriptions/:id/cancel` - Cancel
pub fn subscription_routes() -> Router<SubscriptionAppState> {
    Router::new()
        .route("/subscriptions", get(index_unscoped).post(create_unscoped))
        .route("/subscriptions/new", get(new_unscoped))
        .route(
            "/subscriptions/:id",
            get(show_unscoped)
                .put(update_unscoped)
                .patch(update_unscoped),
        )
        .route("/subscriptions/:id/edit", get(edit_unscoped))
        .route("/subscriptions/:id/cancel", post(cancel_unscoped))
        .route(
            "/owners/:owner_id/subscriptions",
            get(index_for_owner).post(create_for_owner),
        )
        .route("/owners/:owner_id/subscriptions/new", get(new_for_owner))
        .route(
            "/owners/:owner_id/subscriptions/:id",
            get(show).put(update).patch(update),
        )
        .route("/owners/:owner_id/subscriptions/:id/edit", get(edit))
        .route("/owners/:owner_id/subscriptions/:id/cancel", post(cancel))
}

/// Create the complete subscription router under `mount`.
///
/// An empty mount serves the routes at the root. `/health` is always
/// served at the root.
///
/// ```ignore
/// let app = subscription_router("/billing").with_state(app_state);
/// ```
pub fn subscription_router(mount: &str) -> Router<SubscriptionAppState> {
    let mount = mount.trim_end_matches('/');
    let routes = if mount.is_empty() {
        subscription_routes()
    } else {
        Router::new().nest(mount, subscription_routes())
    };
    routes.route("/health", get(health))
}
