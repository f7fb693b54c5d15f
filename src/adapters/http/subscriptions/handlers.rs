//! HTTP handlers for subscription endpoints.
//!
//! Each handler resolves the owner first, then runs the matching
//! application handler and turns its outcome into a response.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequest, Path, Query, Request, State};
use axum::http::header::{CONTENT_TYPE, LOCATION, SET_COOKIE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::application::handlers::subscription::{
    ActionOutcome, CancelSubscriptionCommand, CancelSubscriptionHandler,
    CreateSubscriptionCommand, CreateSubscriptionHandler, EditSubscriptionHandler,
    IndexSubscriptionsHandler, IndexSubscriptionsQuery, NewSubscriptionHandler,
    NewSubscriptionQuery, OwnerContext, Redirect, ResolveOwnerHandler, ResolveOwnerQuery,
    ShowSubscriptionHandler, ShowSubscriptionQuery, SubscriptionPaths,
    UpdateSubscriptionCommand, UpdateSubscriptionHandler, View,
};
use crate::domain::foundation::Principal;
use crate::domain::subscription::{ParamPolicy, SubscriptionError, SubscriptionParams};
use crate::ports::{
    BillingCustomerResolver, CurrentOwnerAccessor, OwnerDirectory, PlanReader, SignUpFlow,
    SubscriptionRepository,
};

use super::super::middleware::OptionalAuth;
use super::dto::{
    EditResponse, ErrorResponse, IndexResponse, NewResponse, NewSubscriptionParams,
    RedirectResponse, ShowResponse, ViewResponse,
};

const RETURN_TO_COOKIE: &str = "return_to";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Deployment settings shared by every subscription request.
#[derive(Debug, Clone)]
pub struct SubscriptionSettings {
    pub paths: SubscriptionPaths,
    pub param_policy: ParamPolicy,
    /// Scope passed to the sign-up flow (`user`, `account`, ...).
    pub sign_up_scope: String,
    /// Replaces the default notice after a successful create.
    pub new_subscription_notice: Option<String>,
}

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct SubscriptionAppState {
    pub owner_directory: Arc<dyn OwnerDirectory>,
    pub current_owner: Arc<dyn CurrentOwnerAccessor>,
    pub billing_customers: Arc<dyn BillingCustomerResolver>,
    pub subscription_repository: Arc<dyn SubscriptionRepository>,
    pub plan_reader: Arc<dyn PlanReader>,
    pub sign_up_flow: Option<Arc<dyn SignUpFlow>>,
    pub settings: SubscriptionSettings,
}

impl SubscriptionAppState {
    pub fn resolve_owner_handler(&self) -> ResolveOwnerHandler {
        ResolveOwnerHandler::new(
            self.owner_directory.clone(),
            self.current_owner.clone(),
            self.billing_customers.clone(),
        )
    }

    pub fn index_handler(&self) -> IndexSubscriptionsHandler {
        IndexSubscriptionsHandler::new(
            self.subscription_repository.clone(),
            self.plan_reader.clone(),
            self.settings.paths.clone(),
        )
    }

    pub fn new_handler(&self) -> NewSubscriptionHandler {
        NewSubscriptionHandler::new(
            self.subscription_repository.clone(),
            self.plan_reader.clone(),
            self.sign_up_flow.clone(),
            self.settings.sign_up_scope.clone(),
            self.settings.paths.clone(),
        )
    }

    pub fn create_handler(&self) -> CreateSubscriptionHandler {
        let handler = CreateSubscriptionHandler::new(
            self.subscription_repository.clone(),
            self.plan_reader.clone(),
            self.settings.paths.clone(),
        );
        match &self.settings.new_subscription_notice {
            Some(notice) => handler.with_notice(notice.clone()),
            None => handler,
        }
    }

    pub fn show_handler(&self) -> ShowSubscriptionHandler {
        ShowSubscriptionHandler::new(self.subscription_repository.clone())
    }

    pub fn edit_handler(&self) -> EditSubscriptionHandler {
        EditSubscriptionHandler::new(
            self.subscription_repository.clone(),
            self.plan_reader.clone(),
        )
    }

    pub fn update_handler(&self) -> UpdateSubscriptionHandler {
        UpdateSubscriptionHandler::new(
            self.subscription_repository.clone(),
            self.plan_reader.clone(),
            self.settings.paths.clone(),
        )
    }

    pub fn cancel_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(
            self.subscription_repository.clone(),
            self.settings.paths.clone(),
        )
    }

    async fn context(
        &self,
        owner_param: Option<String>,
        principal: Option<Principal>,
    ) -> Result<OwnerContext, SubscriptionApiError> {
        let query = ResolveOwnerQuery {
            owner_param,
            principal,
        };
        Ok(self.resolve_owner_handler().handle(query).await?)
    }

    fn params(&self, body: &Value) -> Result<SubscriptionParams, SubscriptionApiError> {
        SubscriptionParams::from_body(body, self.settings.param_policy)
            .map_err(|e| SubscriptionApiError(e.into()))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request Body
// ════════════════════════════════════════════════════════════════════════════════

/// Submitted subscription attributes, from JSON or an HTML form.
///
/// Form fields use the nested `subscription[plan_id]` naming and are folded
/// into the same shape as a JSON body.
#[derive(Debug, Clone)]
pub struct SubscriptionBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for SubscriptionBody
where
    S: Send + Sync,
{
    type Rejection = SubscriptionApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| body_rejected(e.body_text()))?;
            Ok(SubscriptionBody(nest_form_pairs(pairs)))
        } else {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| body_rejected(e.body_text()))?;
            Ok(SubscriptionBody(value))
        }
    }
}

fn body_rejected(reason: String) -> SubscriptionApiError {
    SubscriptionApiError(SubscriptionError::validation("subscription", reason))
}

/// Folds `outer[inner]=value` pairs into `{ "outer": { "inner": value } }`.
fn nest_form_pairs(pairs: Vec<(String, String)>) -> Value {
    let mut root = Map::new();
    for (key, value) in pairs {
        let nested = key
            .strip_suffix(']')
            .and_then(|k| k.split_once('['))
            .filter(|(outer, inner)| !outer.is_empty() && !inner.contains('['));

        match nested {
            Some((outer, inner)) => {
                let entry = root
                    .entry(outer.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(map) = entry {
                    map.insert(inner.to_string(), Value::String(value));
                }
            }
            None => {
                root.insert(key, Value::String(value));
            }
        }
    }
    Value::Object(root)
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /subscriptions - Pricing page for the principal's own owner
pub async fn index_unscoped(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
) -> Result<Response, SubscriptionApiError> {
    index(&state, None, principal).await
}

/// GET /owners/:owner_id/subscriptions - Pricing page for an owner
pub async fn index_for_owner(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(owner_id): Path<String>,
) -> Result<Response, SubscriptionApiError> {
    index(&state, Some(owner_id), principal).await
}

async fn index(
    state: &SubscriptionAppState,
    owner_param: Option<String>,
    principal: Option<Principal>,
) -> Result<Response, SubscriptionApiError> {
    let context = state.context(owner_param, principal).await?;
    let outcome = state
        .index_handler()
        .handle(IndexSubscriptionsQuery { context })
        .await?;
    Ok(respond::<_, IndexResponse>(outcome))
}

/// GET /subscriptions/new - Subscribe form, or a redirect to sign up
///
/// Anonymous visitors are sent to sign up rather than denied.
pub async fn new_unscoped(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Query(params): Query<NewSubscriptionParams>,
) -> Result<Response, SubscriptionApiError> {
    new_in(&state, None, principal, params).await
}

/// GET /owners/:owner_id/subscriptions/new - Subscribe form for an owner
pub async fn new_for_owner(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(owner_id): Path<String>,
    Query(params): Query<NewSubscriptionParams>,
) -> Result<Response, SubscriptionApiError> {
    new_in(&state, Some(owner_id), principal, params).await
}

async fn new_in(
    state: &SubscriptionAppState,
    owner_param: Option<String>,
    principal: Option<Principal>,
    params: NewSubscriptionParams,
) -> Result<Response, SubscriptionApiError> {
    let context = state.context(owner_param, principal).await?;
    let outcome = state
        .new_handler()
        .handle(NewSubscriptionQuery {
            context,
            plan: params.plan,
        })
        .await?;
    Ok(respond::<_, NewResponse>(outcome))
}

/// GET /owners/:owner_id/subscriptions/:id
pub async fn show(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Path((owner_id, id)): Path<(String, String)>,
) -> Result<Response, SubscriptionApiError> {
    show_in(&state, Some(owner_id), id, principal).await
}

/// GET /subscriptions/:id
pub async fn show_unscoped(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(id): Path<String>,
) -> Result<Response, SubscriptionApiError> {
    show_in(&state, None, id, principal).await
}

async fn show_in(
    state: &SubscriptionAppState,
    owner_param: Option<String>,
    subscription_param: String,
    principal: Option<Principal>,
) -> Result<Response, SubscriptionApiError> {
    let context = state.context(owner_param, principal).await?;
    let outcome = state
        .show_handler()
        .handle(ShowSubscriptionQuery {
            context,
            subscription_param,
        })
        .await?;
    Ok(respond::<_, ShowResponse>(outcome))
}

/// GET /owners/:owner_id/subscriptions/:id/edit
pub async fn edit(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Path((owner_id, id)): Path<(String, String)>,
) -> Result<Response, SubscriptionApiError> {
    edit_in(&state, Some(owner_id), id, principal).await
}

/// GET /subscriptions/:id/edit
pub async fn edit_unscoped(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(id): Path<String>,
) -> Result<Response, SubscriptionApiError> {
    edit_in(&state, None, id, principal).await
}

async fn edit_in(
    state: &SubscriptionAppState,
    owner_param: Option<String>,
    subscription_param: String,
    principal: Option<Principal>,
) -> Result<Response, SubscriptionApiError> {
    let context = state.context(owner_param, principal).await?;
    let outcome = state
        .edit_handler()
        .handle(ShowSubscriptionQuery {
            context,
            subscription_param,
        })
        .await?;
    Ok(respond::<_, EditResponse>(outcome))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST/PUT/PATCH endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /subscriptions
pub async fn create_unscoped(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    SubscriptionBody(body): SubscriptionBody,
) -> Result<Response, SubscriptionApiError> {
    create(&state, None, principal, &body).await
}

/// POST /owners/:owner_id/subscriptions
pub async fn create_for_owner(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(owner_id): Path<String>,
    SubscriptionBody(body): SubscriptionBody,
) -> Result<Response, SubscriptionApiError> {
    create(&state, Some(owner_id), principal, &body).await
}

async fn create(
    state: &SubscriptionAppState,
    owner_param: Option<String>,
    principal: Option<Principal>,
    body: &Value,
) -> Result<Response, SubscriptionApiError> {
    let context = state.context(owner_param, principal).await?;
    let params = state.params(body)?;
    let outcome = state
        .create_handler()
        .handle(CreateSubscriptionCommand { context, params })
        .await?;
    Ok(respond::<_, NewResponse>(outcome))
}

/// PUT|PATCH /owners/:owner_id/subscriptions/:id
pub async fn update(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Path((owner_id, id)): Path<(String, String)>,
    SubscriptionBody(body): SubscriptionBody,
) -> Result<Response, SubscriptionApiError> {
    update_in(&state, Some(owner_id), id, principal, &body).await
}

/// PUT|PATCH /subscriptions/:id
pub async fn update_unscoped(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(id): Path<String>,
    SubscriptionBody(body): SubscriptionBody,
) -> Result<Response, SubscriptionApiError> {
    update_in(&state, None, id, principal, &body).await
}

async fn update_in(
    state: &SubscriptionAppState,
    owner_param: Option<String>,
    subscription_param: String,
    principal: Option<Principal>,
    body: &Value,
) -> Result<Response, SubscriptionApiError> {
    let context = state.context(owner_param, principal).await?;
    let params = state.params(body)?;
    let outcome = state
        .update_handler()
        .handle(UpdateSubscriptionCommand {
            context,
            subscription_param,
            params,
        })
        .await?;
    Ok(respond::<_, EditResponse>(outcome))
}

/// POST /owners/:owner_id/subscriptions/:id/cancel
pub async fn cancel(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Path((owner_id, id)): Path<(String, String)>,
) -> Result<Response, SubscriptionApiError> {
    cancel_in(&state, Some(owner_id), id, principal).await
}

/// POST /subscriptions/:id/cancel
pub async fn cancel_unscoped(
    State(state): State<SubscriptionAppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(id): Path<String>,
) -> Result<Response, SubscriptionApiError> {
    cancel_in(&state, None, id, principal).await
}

async fn cancel_in(
    state: &SubscriptionAppState,
    owner_param: Option<String>,
    subscription_param: String,
    principal: Option<Principal>,
) -> Result<Response, SubscriptionApiError> {
    let context = state.context(owner_param, principal).await?;
    let outcome = state
        .cancel_handler()
        .handle(CancelSubscriptionCommand {
            context,
            subscription_param,
        })
        .await?;
    Ok(respond::<_, ()>(outcome))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

fn respond<T, R>(outcome: ActionOutcome<T>) -> Response
where
    R: From<T> + Serialize,
{
    match outcome {
        ActionOutcome::Redirect(redirect) => redirect_response(&redirect),
        ActionOutcome::Render(render) => (
            StatusCode::OK,
            Json(ViewResponse {
                view: render.view,
                flash: render.flash,
                body: R::from(render.body),
            }),
        )
            .into_response(),
    }
}

fn redirect_response(redirect: &Redirect) -> Response {
    let mut response = (
        StatusCode::SEE_OTHER,
        Json(RedirectResponse::from(redirect)),
    )
        .into_response();

    match HeaderValue::from_str(&redirect.location) {
        Ok(location) => {
            response.headers_mut().insert(LOCATION, location);
        }
        Err(e) => tracing::warn!(location = %redirect.location, error = %e, "Unencodable redirect location"),
    }

    if let Some(path) = &redirect.return_to {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            RETURN_TO_COOKIE, path
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(return_to = %path, error = %e, "Unencodable return path"),
        }
    }

    response
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts subscription errors to HTTP responses.
#[derive(Debug)]
pub struct SubscriptionApiError(SubscriptionError);

impl From<SubscriptionError> for SubscriptionApiError {
    fn from(err: SubscriptionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SubscriptionApiError {
    fn into_response(self) -> Response {
        let code = self.0.code().to_string();
        let message = self.0.message();

        let (status, body) = match &self.0 {
            SubscriptionError::Unauthorized(reason) => {
                tracing::debug!(reason = reason.as_str(), "Rendering unauthorized view");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new(code, message).with_view(View::Unauthorized),
                )
            }
            SubscriptionError::SubscriptionNotFound(_) | SubscriptionError::PlanNotFound(_) => {
                (StatusCode::NOT_FOUND, ErrorResponse::new(code, message))
            }
            SubscriptionError::ValidationFailed { field, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new(code, message)
                    .with_details(serde_json::json!({ "field": field })),
            ),
            SubscriptionError::MisconfiguredDependency(capability) => {
                tracing::error!(capability = %capability, "Subscription action misconfigured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(code, message),
                )
            }
            SubscriptionError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "Subscription action failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(code, "An internal error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::{messages, Flash};
    use crate::domain::foundation::SubscriptionId;
    use crate::domain::owner::AccessDenial;
    use serde_json::json;

    // ════════════════════════════════════════════════════════════════════════════
    // Form Folding Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn nested_form_keys_are_folded() {
        let value = nest_form_pairs(vec![
            ("subscription[plan_id]".to_string(), "3".to_string()),
            ("subscription[last_four]".to_string(), "4242".to_string()),
            ("commit".to_string(), "Subscribe".to_string()),
        ]);

        assert_eq!(
            value,
            json!({
                "subscription": {"plan_id": "3", "last_four": "4242"},
                "commit": "Subscribe"
            })
        );
    }

    #[test]
    fn malformed_form_keys_stay_flat() {
        let value = nest_form_pairs(vec![
            ("[plan_id]".to_string(), "1".to_string()),
            ("a[b][c]".to_string(), "2".to_string()),
        ]);
        assert_eq!(value, json!({"[plan_id]": "1", "a[b][c]": "2"}));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Response Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn redirect_is_see_other_with_location() {
        let redirect = Redirect::to("/owners/5/subscriptions/1")
            .with_flash(Flash::notice(messages::CANCELLED));
        let response = redirect_response(&redirect);

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/owners/5/subscriptions/1"
        );
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[test]
    fn return_to_is_stored_in_cookie() {
        let redirect = Redirect::to("/sign_up").with_return_to("/subscriptions/new?plan=2");
        let response = redirect_response(&redirect);

        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("return_to=/subscriptions/new?plan=2;"));
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let response =
            SubscriptionApiError(SubscriptionError::unauthorized(AccessDenial::CustomerMismatch))
                .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn missing_records_map_to_404() {
        let response =
            SubscriptionApiError(SubscriptionError::not_found(SubscriptionId::new(3)))
                .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            SubscriptionApiError(SubscriptionError::plan_not_found("9")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_422() {
        let response =
            SubscriptionApiError(SubscriptionError::validation("plan_id", "is required"))
                .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn misconfiguration_maps_to_500() {
        let response =
            SubscriptionApiError(SubscriptionError::misconfigured("sign_up_flow")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
