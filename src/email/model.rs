//! Email record and status lifecycle

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::render::Variables;

/// Delivery status of an email record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    #[default]
    Draft,
    Sent,
    Failed,
}

impl EmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailStatus::Draft => "draft",
            EmailStatus::Sent => "sent",
            EmailStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EmailStatus::Draft),
            "sent" => Ok(EmailStatus::Sent),
            "failed" => Ok(EmailStatus::Failed),
            other => Err(format!("unknown email status: {}", other)),
        }
    }
}

/// A rendered markdown email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkdownEmail {
    pub id: Uuid,

    /// Sanitized subject line
    pub subject: String,

    /// Markdown source as supplied (before substitution)
    pub markdown_content: String,

    /// Complete rendered HTML document
    pub html_content: String,

    pub recipients: Vec<String>,

    #[serde(default)]
    pub variables: Variables,

    /// Layout used to render the email
    pub template_used: String,

    #[serde(default)]
    pub status: EmailStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Fields for a new draft email
#[derive(Debug, Clone)]
pub struct NewEmail {
    pub subject: String,
    pub markdown_content: String,
    pub html_content: String,
    pub recipients: Vec<String>,
    pub variables: Variables,
    pub template_used: String,
}

impl MarkdownEmail {
    /// Create a draft record with a fresh ID
    pub fn draft(new: NewEmail) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            subject: new.subject,
            markdown_content: new.markdown_content,
            html_content: new.html_content,
            recipients: new.recipients,
            variables: new.variables,
            template_used: new.template_used,
            status: EmailStatus::Draft,
            error_message: None,
            sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to `sent`, stamping `sent_at`
    pub fn mark_sent(&mut self) {
        let now = Utc::now();
        self.status = EmailStatus::Sent;
        self.sent_at = Some(now);
        self.updated_at = now;
    }

    /// Transition to `failed`, recording the error
    pub fn mark_failed(&mut self, error_message: impl Into<String>) {
        self.status = EmailStatus::Failed;
        self.error_message = Some(error_message.into());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
pub(crate) fn sample_email() -> MarkdownEmail {
    MarkdownEmail::draft(NewEmail {
        subject: "Test Email".to_string(),
        markdown_content: "# Hello World".to_string(),
        html_content: "<h1>Hello World</h1>".to_string(),
        recipients: vec!["test@example.com".to_string()],
        variables: [(
            "name".to_string(),
            crate::render::VariableValue::from("John"),
        )]
        .into_iter()
        .collect(),
        template_used: "base-template".to_string(),
    })
}
