//! Stored email endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::email::{CreateEmail, EmailStatus, MarkdownEmail};
use crate::error::{AppError, Result};
use crate::render::Variables;
use crate::server::AppState;

/// Request to render and record a new email
#[derive(Debug, Deserialize)]
pub struct CreateEmailRequest {
    pub subject: String,
    pub markdown: String,
    pub recipients: Vec<String>,
    #[serde(default)]
    pub variables: Variables,
    #[serde(default)]
    pub template: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListEmailsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmailListResponse {
    pub emails: Vec<MarkdownEmail>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct MarkFailedRequest {
    pub error: String,
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::Validation(format!("Invalid email id: {}", id)))
}

/// POST /api/v1/emails - Render and record a draft email
#[tracing::instrument(
    name = "http.create_email",
    skip(state, request),
    fields(recipients = request.recipients.len())
)]
pub async fn create_email(
    State(state): State<AppState>,
    Json(request): Json<CreateEmailRequest>,
) -> Result<(StatusCode, Json<MarkdownEmail>)> {
    if request.subject.trim().is_empty() {
        return Err(AppError::Validation("subject must not be empty".to_string()));
    }
    if request.markdown.trim().is_empty() {
        return Err(AppError::Validation("markdown must not be empty".to_string()));
    }
    if request.recipients.is_empty() {
        return Err(AppError::Validation(
            "at least one recipient is required".to_string(),
        ));
    }

    let email = state
        .email_service
        .create(CreateEmail {
            subject: request.subject,
            markdown: request.markdown,
            recipients: request.recipients,
            variables: request.variables,
            template: request.template,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(email)))
}

/// GET /api/v1/emails - List emails, optionally by status
#[tracing::instrument(name = "http.list_emails", skip(state))]
pub async fn list_emails(
    State(state): State<AppState>,
    Query(query): Query<ListEmailsQuery>,
) -> Result<Json<EmailListResponse>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<EmailStatus>)
        .transpose()
        .map_err(AppError::Validation)?;

    let emails = state.email_service.list(status).await?;
    let total = emails.len();

    Ok(Json(EmailListResponse { emails, total }))
}

/// GET /api/v1/emails/{id} - Get a specific email
#[tracing::instrument(name = "http.get_email", skip(state))]
pub async fn get_email(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MarkdownEmail>> {
    let id = parse_id(&id)?;
    Ok(Json(state.email_service.get(id).await?))
}

/// POST /api/v1/emails/{id}/sent - Record a successful delivery
#[tracing::instrument(name = "http.mark_email_sent", skip(state))]
pub async fn mark_email_sent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MarkdownEmail>> {
    let id = parse_id(&id)?;
    Ok(Json(state.email_service.mark_sent(id).await?))
}

/// POST /api/v1/emails/{id}/failed - Record a failed delivery
#[tracing::instrument(name = "http.mark_email_failed", skip(state, request))]
pub async fn mark_email_failed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MarkFailedRequest>,
) -> Result<Json<MarkdownEmail>> {
    let id = parse_id(&id)?;
    if request.error.trim().is_empty() {
        return Err(AppError::Validation("error must not be empty".to_string()));
    }

    Ok(Json(
        state.email_service.mark_failed(id, &request.error).await?,
    ))
}
