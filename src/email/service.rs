//! Email creation and status lifecycle

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::LoggingConfig;
use crate::render::{MarkdownEmailRenderer, RenderError, Variables};
use crate::sanitize::sanitize_subject;

use super::events::{EmailEvent, EmailEventBus};
use super::model::{EmailStatus, MarkdownEmail, NewEmail};
use super::store::{EmailStore, StoreError};

/// Errors from email service operations
#[derive(Debug, Error)]
pub enum EmailError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for [`EmailService::create`]
#[derive(Debug, Clone, Default)]
pub struct CreateEmail {
    pub subject: String,
    pub markdown: String,
    pub recipients: Vec<String>,
    pub variables: Variables,
    pub template: Option<String>,
}

/// Statistics for the email service
#[derive(Debug, Default)]
pub struct EmailStats {
    pub created: AtomicU64,
    pub render_failures: AtomicU64,
    pub sent: AtomicU64,
    pub failed: AtomicU64,
}

impl EmailStats {
    pub fn snapshot(&self) -> EmailStatsSnapshot {
        EmailStatsSnapshot {
            created: self.created.load(Ordering::Relaxed),
            render_failures: self.render_failures.load(Ordering::Relaxed),
            sent: self.sent.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of email service statistics
#[derive(Debug, Clone, Serialize)]
pub struct EmailStatsSnapshot {
    pub created: u64,
    pub render_failures: u64,
    pub sent: u64,
    pub failed: u64,
}

/// Renders, stores and tracks markdown emails
pub struct EmailService {
    renderer: Arc<MarkdownEmailRenderer>,
    store: Arc<dyn EmailStore>,
    events: EmailEventBus,
    logging: LoggingConfig,
    store_emails: bool,
    stats: EmailStats,
}

impl EmailService {
    pub fn new(
        renderer: Arc<MarkdownEmailRenderer>,
        store: Arc<dyn EmailStore>,
        events: EmailEventBus,
        logging: LoggingConfig,
        store_emails: bool,
    ) -> Self {
        Self {
            renderer,
            store,
            events,
            logging,
            store_emails,
            stats: EmailStats::default(),
        }
    }

    pub fn events(&self) -> &EmailEventBus {
        &self.events
    }

    pub fn store(&self) -> &Arc<dyn EmailStore> {
        &self.store
    }

    pub fn stats(&self) -> EmailStatsSnapshot {
        self.stats.snapshot()
    }

    /// Render a new email and record it as a draft.
    ///
    /// The record is only persisted when storing is enabled; either way the
    /// draft is returned.
    #[tracing::instrument(
        name = "email.create",
        skip(self, input),
        fields(recipients = input.recipients.len())
    )]
    pub async fn create(&self, input: CreateEmail) -> Result<MarkdownEmail, EmailError> {
        let html_content = self
            .renderer
            .render(&input.markdown, &input.variables, input.template.as_deref())
            .inspect_err(|_| {
                self.stats.render_failures.fetch_add(1, Ordering::Relaxed);
            })?;

        let template_used = input
            .template
            .unwrap_or_else(|| self.renderer.default_template().to_string());

        let email = MarkdownEmail::draft(NewEmail {
            subject: sanitize_subject(&input.subject),
            markdown_content: input.markdown,
            html_content,
            recipients: input.recipients,
            variables: input.variables,
            template_used,
        });

        if self.store_emails {
            self.store.save(&email).await?;
        }
        self.stats.created.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            email_id = %email.id,
            template = %email.template_used,
            stored = self.store_emails,
            "Markdown email created"
        );

        Ok(email)
    }

    pub async fn get(&self, id: Uuid) -> Result<MarkdownEmail, EmailError> {
        Ok(self.store.get(id).await?)
    }

    pub async fn list(&self, status: Option<EmailStatus>) -> Result<Vec<MarkdownEmail>, EmailError> {
        Ok(self.store.list(status).await?)
    }

    /// Mark an email as sent and publish [`EmailEvent::Sent`]
    #[tracing::instrument(name = "email.mark_sent", skip(self))]
    pub async fn mark_sent(&self, id: Uuid) -> Result<MarkdownEmail, EmailError> {
        let email = self.store.mark_sent(id).await?;
        self.stats.sent.fetch_add(1, Ordering::Relaxed);

        tracing::info!(email_id = %id, "Markdown email sent");
        self.events.publish(EmailEvent::Sent {
            email: email.clone(),
        });

        Ok(email)
    }

    /// Mark an email as failed, publish [`EmailEvent::Failed`] and log the
    /// failure when logging is enabled
    #[tracing::instrument(name = "email.mark_failed", skip(self, error_message))]
    pub async fn mark_failed(
        &self,
        id: Uuid,
        error_message: &str,
    ) -> Result<MarkdownEmail, EmailError> {
        let email = self.store.mark_failed(id, error_message).await?;
        self.stats.failed.fetch_add(1, Ordering::Relaxed);

        self.events.publish(EmailEvent::Failed {
            email: email.clone(),
            error: error_message.to_string(),
        });

        if self.logging.enabled {
            self.log_failure(&email, error_message);
        }

        Ok(email)
    }

    fn log_failure(&self, email: &MarkdownEmail, error_message: &str) {
        let recipients = email.recipients.join(", ");

        if self.logging.log_content {
            tracing::error!(
                channel = %self.logging.channel,
                email_id = %email.id,
                error = %error_message,
                subject = %email.subject,
                recipients = %recipients,
                markdown = %email.markdown_content,
                "Markdown email failed"
            );
        } else {
            tracing::error!(
                channel = %self.logging.channel,
                email_id = %email.id,
                error = %error_message,
                subject = %email.subject,
                recipients = %recipients,
                "Markdown email failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::email::MemoryEmailStore;
    use crate::render::VariableValue;

    fn service(store_emails: bool) -> EmailService {
        let renderer = Arc::new(MarkdownEmailRenderer::new(&Settings::default()));
        EmailService::new(
            renderer,
            Arc::new(MemoryEmailStore::new()),
            EmailEventBus::default(),
            LoggingConfig::default(),
            store_emails,
        )
    }

    fn welcome() -> CreateEmail {
        CreateEmail {
            subject: "Welcome\r\nBcc: victim@example.com".to_string(),
            markdown: "# Hello {{name}}".to_string(),
            recipients: vec!["john@example.com".to_string()],
            variables: [("name".to_string(), VariableValue::from("John"))]
                .into_iter()
                .collect(),
            template: None,
        }
    }

    #[tokio::test]
    async fn test_create_stores_draft() {
        let service = service(true);
        let email = service.create(welcome()).await.unwrap();

        assert_eq!(email.status, EmailStatus::Draft);
        assert_eq!(email.subject, "WelcomeBcc: victim@example.com");
        assert_eq!(email.template_used, "base-template");
        assert_eq!(email.markdown_content, "# Hello {{name}}");
        assert!(email.html_content.contains("Hello John"));

        let stored = service.get(email.id).await.unwrap();
        assert_eq!(stored.id, email.id);
        assert_eq!(service.stats().created, 1);
    }

    #[tokio::test]
    async fn test_create_without_storing() {
        let service = service(false);
        let email = service.create(welcome()).await.unwrap();

        assert!(matches!(
            service.get(email.id).await,
            Err(EmailError::Store(StoreError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_create_render_failure() {
        let service = service(true);
        let input = CreateEmail {
            variables: Variables::new(),
            ..welcome()
        };

        assert!(matches!(
            service.create(input).await,
            Err(EmailError::Render(RenderError::MissingVariables { .. }))
        ));
        assert_eq!(service.store().count().await.unwrap(), 0);
        assert_eq!(service.stats().render_failures, 1);
    }

    #[tokio::test]
    async fn test_unknown_template_is_render_failure() {
        let service = service(true);
        let input = CreateEmail {
            template: Some("missing-layout".to_string()),
            ..welcome()
        };

        assert!(matches!(
            service.create(input).await,
            Err(EmailError::Render(RenderError::TemplateRenderFailure(_)))
        ));
    }

    #[tokio::test]
    async fn test_mark_sent_publishes_event() {
        let service = service(true);
        let mut events = service.events().subscribe();
        let email = service.create(welcome()).await.unwrap();

        let sent = service.mark_sent(email.id).await.unwrap();
        assert_eq!(sent.status, EmailStatus::Sent);

        match events.recv().await.unwrap() {
            EmailEvent::Sent { email: event_email } => assert_eq!(event_email.id, email.id),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(service.stats().sent, 1);
    }

    #[tokio::test]
    async fn test_mark_failed_publishes_event() {
        let service = service(true);
        let mut events = service.events().subscribe();
        let email = service.create(welcome()).await.unwrap();

        let failed = service.mark_failed(email.id, "SMTP timeout").await.unwrap();
        assert_eq!(failed.status, EmailStatus::Failed);
        assert_eq!(failed.error_message.as_deref(), Some("SMTP timeout"));

        match events.recv().await.unwrap() {
            EmailEvent::Failed { error, .. } => assert_eq!(error, "SMTP timeout"),
            other => panic!("unexpected event: {:?}", other),
        }

        let failed_list = service.list(Some(EmailStatus::Failed)).await.unwrap();
        assert_eq!(failed_list.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_unknown_email() {
        let service = service(true);
        assert!(matches!(
            service.mark_sent(Uuid::new_v4()).await,
            Err(EmailError::Store(StoreError::NotFound(_)))
        ));
    }
}
