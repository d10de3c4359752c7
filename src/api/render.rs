//! Stateless rendering endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::button::{build_button, ButtonType};
use crate::error::{AppError, Result};
use crate::render::RenderRequest;
use crate::server::AppState;

/// Rendered HTML fragment or document
#[derive(Debug, Serialize)]
pub struct HtmlResponse {
    pub html: String,
}

/// Request to build a call-to-action button
#[derive(Debug, Deserialize)]
pub struct ButtonRequest {
    pub text: String,
    pub url: String,
    /// Preset key; unknown keys render with the primary preset
    #[serde(rename = "type", default = "default_button_type")]
    pub button_type: String,
}

fn default_button_type() -> String {
    ButtonType::Primary.to_string()
}

/// POST /api/v1/render - Render markdown into a complete email document
#[tracing::instrument(
    name = "http.render_markdown",
    skip(state, request),
    fields(template = ?request.template, variables = request.variables.len())
)]
pub async fn render_markdown(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<HtmlResponse>> {
    if request.markdown.trim().is_empty() {
        return Err(AppError::Validation("markdown must not be empty".to_string()));
    }

    let html = state.renderer.render_request(&request)?;
    Ok(Json(HtmlResponse { html }))
}

/// POST /api/v1/buttons - Build a styled button anchor
#[tracing::instrument(
    name = "http.render_button",
    skip(state, request),
    fields(button_type = %request.button_type)
)]
pub async fn render_button(
    State(state): State<AppState>,
    Json(request): Json<ButtonRequest>,
) -> Result<Json<HtmlResponse>> {
    if request.text.is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }

    let html = build_button(
        &request.text,
        &request.url,
        &request.button_type,
        &state.settings.buttons,
    );
    Ok(Json(HtmlResponse { html }))
}
