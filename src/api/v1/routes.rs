/*
 * Responsibility
 * - v1 URL layout
 * - /health, /notifications (POST subscribe / DELETE unsubscribe)
 */
use axum::{Router, routing::get, routing::post};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    notifications::{create_subscription, remove_subscription},
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health)).route(
        "/notifications",
        post(create_subscription).delete(remove_subscription),
    )
}
