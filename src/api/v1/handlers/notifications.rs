/*
 * Responsibility
 * - POST   /notifications: register the browser's push subscription for the session user
 * - DELETE /notifications: drop the subscription named by the `subscription_id` cookie
 * - Cookies are the whole session: `auth_token` (JWT) in, `subscription_id` in/out
 */
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::{
    api::v1::dto::notifications::CreateSubscriptionResponse,
    error::AppError,
    repos::subscription_repo::SubscriptionId,
    state::AppState,
};

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";
pub const SUBSCRIPTION_ID_COOKIE: &str = "subscription_id";

const CREATE_ERROR_KEY: &str = "create_subscription_error";
// Delete failures get their own message instead of reusing the create one.
const REMOVE_ERROR_KEY: &str = "remove_subscription_error";

// Media type essence only: `application/json; charset=utf-8` is accepted.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

pub async fn create_subscription(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(CookieJar, Json<CreateSubscriptionResponse>), AppError> {
    if !is_json(&headers) {
        return Err(AppError::NotFound);
    }

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "subscription body is not valid JSON");
        AppError::bad_request("invalid JSON body")
    })?;

    let token = jar
        .get(AUTH_TOKEN_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Forbidden)?;

    let user = state.sessions.decode(token).map_err(|err| {
        tracing::warn!(error = %err, "rejected session token");
        AppError::Forbidden
    })?;

    // Store failures are logged and reported as "no subscription created" (404).
    let subscription_id = match state.store.create(&user.user_id, &payload).await {
        Ok(id) => id,
        Err(err) => {
            tracing::error!(
                backend = state.store.backend_name(),
                user_id = %user.user_id,
                "{}",
                state.failure_message(CREATE_ERROR_KEY, &err)
            );
            None
        }
    };

    let subscription_id = subscription_id.ok_or(AppError::NotFound)?;

    tracing::info!(
        user_id = %user.user_id,
        subscription_id = %subscription_id,
        "push subscription created"
    );

    let cookie = Cookie::build((SUBSCRIPTION_ID_COOKIE, subscription_id.to_string())).path("/");
    let jar = jar.add(cookie);

    Ok((jar, Json(CreateSubscriptionResponse { subscription_id })))
}

// No auth check: whoever holds the `subscription_id` cookie may drop that subscription.
pub async fn remove_subscription(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AppError> {
    let subscription_id = jar
        .get(SUBSCRIPTION_ID_COOKIE)
        .and_then(|c| match c.value().parse::<SubscriptionId>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    value = c.value(),
                    "ignoring malformed subscription_id cookie"
                );
                None
            }
        });

    let deleted = match subscription_id {
        Some(id) => state.store.remove(id).await.map_err(|err| {
            tracing::error!(
                backend = state.store.backend_name(),
                subscription_id = %id,
                error = %err,
                "failed to remove push subscription"
            );
            AppError::internal(state.failure_message(REMOVE_ERROR_KEY, &err))
        })?,
        None => 0,
    };

    if deleted == 0 {
        return Err(AppError::NotFound);
    }

    let jar = jar.remove(Cookie::build(SUBSCRIPTION_ID_COOKIE).path("/"));

    Ok((jar, StatusCode::OK))
}
