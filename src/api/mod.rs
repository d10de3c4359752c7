//! API layer - HTTP endpoint handlers organized by domain.

mod emails;
mod health;
mod render;
mod routes;

// Re-export all handlers for use in server/app.rs
pub use emails::{
    create_email, get_email, list_emails, mark_email_failed, mark_email_sent, CreateEmailRequest,
    EmailListResponse, ListEmailsQuery, MarkFailedRequest,
};
pub use health::{health, HealthResponse};
pub use render::{render_button, render_markdown, ButtonRequest, HtmlResponse};
pub use routes::api_routes;
