use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::middleware::api_key_auth;
use crate::server::AppState;

use super::emails::{create_email, get_email, list_emails, mark_email_failed, mark_email_sent};
use super::health::health;
use super::render::{render_button, render_markdown};

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health))
        .nest(
            "/api/v1",
            Router::new()
                // Stateless rendering
                .route("/render", post(render_markdown))
                .route("/buttons", post(render_button))
                // Stored emails
                .route("/emails", post(create_email).get(list_emails))
                .route("/emails/{id}", get(get_email))
                .route("/emails/{id}/sent", post(mark_email_sent))
                .route("/emails/{id}/failed", post(mark_email_failed))
                .route_layer(middleware::from_fn_with_state(state, api_key_auth)),
        )
}
