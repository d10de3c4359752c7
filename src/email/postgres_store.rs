//! PostgreSQL-based email store.
//!
//! Records survive service restarts. Recipients and variables are stored as
//! JSONB, status as TEXT.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::render::Variables;

use super::model::{EmailStatus, MarkdownEmail};
use super::store::{EmailStore, StoreError};

const COLUMNS: &str = "id, subject, markdown_content, html_content, recipients, variables, \
     template_used, status, error_message, sent_at, created_at, updated_at";

/// PostgreSQL-based email store.
pub struct PostgresEmailStore {
    pool: PgPool,

    /// Validated table identifier
    table: String,
}

impl PostgresEmailStore {
    /// Create a store over `table_name`.
    ///
    /// The name is interpolated into SQL, so only plain identifiers
    /// (`[A-Za-z_][A-Za-z0-9_]*`, optionally schema-qualified) are accepted.
    pub fn new(pool: PgPool, table_name: &str) -> Result<Self, StoreError> {
        if !is_valid_table_name(table_name) {
            return Err(StoreError::InvalidTableName(table_name.to_string()));
        }

        Ok(Self {
            pool,
            table: table_name.to_string(),
        })
    }

    /// Create the table and its status index if they do not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let create_table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id UUID PRIMARY KEY,
                subject VARCHAR(255) NOT NULL,
                markdown_content TEXT NOT NULL,
                html_content TEXT NOT NULL,
                recipients JSONB NOT NULL DEFAULT '[]',
                variables JSONB NOT NULL DEFAULT '{{}}',
                template_used VARCHAR(255) NOT NULL,
                status VARCHAR(16) NOT NULL DEFAULT 'draft',
                error_message TEXT,
                sent_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            table = self.table
        );
        sqlx::query(&create_table).execute(&self.pool).await?;

        let index = format!(
            "CREATE INDEX IF NOT EXISTS {index}_status_created_idx ON {table} (status, created_at DESC)",
            index = self.table.replace('.', "_"),
            table = self.table
        );
        sqlx::query(&index).execute(&self.pool).await?;

        tracing::info!(table = %self.table, "Email table ready");
        Ok(())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: EmailStatus,
        error_message: Option<&str>,
    ) -> Result<MarkdownEmail, StoreError> {
        let sql = format!(
            r#"
            UPDATE {table}
            SET status = $2,
                error_message = COALESCE($3, error_message),
                sent_at = CASE WHEN $2 = 'sent' THEN NOW() ELSE sent_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {columns}
            "#,
            table = self.table,
            columns = COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(error_message)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        email_from_row(&row)
    }
}

fn is_valid_table_name(name: &str) -> bool {
    let is_identifier = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    let parts: Vec<&str> = name.split('.').collect();
    parts.len() <= 2 && parts.iter().all(|p| is_identifier(p))
}

fn email_from_row(row: &PgRow) -> Result<MarkdownEmail, StoreError> {
    let status: String = row.try_get("status")?;
    let recipients: Json<Vec<String>> = row.try_get("recipients")?;
    let variables: Json<Variables> = row.try_get("variables")?;
    let sent_at: Option<DateTime<Utc>> = row.try_get("sent_at")?;

    Ok(MarkdownEmail {
        id: row.try_get("id")?,
        subject: row.try_get("subject")?,
        markdown_content: row.try_get("markdown_content")?,
        html_content: row.try_get("html_content")?,
        recipients: recipients.0,
        variables: variables.0,
        template_used: row.try_get("template_used")?,
        status: status.parse().map_err(StoreError::Corrupt)?,
        error_message: row.try_get("error_message")?,
        sent_at,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl EmailStore for PostgresEmailStore {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn save(&self, email: &MarkdownEmail) -> Result<(), StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {table} ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                subject = EXCLUDED.subject,
                markdown_content = EXCLUDED.markdown_content,
                html_content = EXCLUDED.html_content,
                recipients = EXCLUDED.recipients,
                variables = EXCLUDED.variables,
                template_used = EXCLUDED.template_used,
                status = EXCLUDED.status,
                error_message = EXCLUDED.error_message,
                sent_at = EXCLUDED.sent_at,
                updated_at = EXCLUDED.updated_at
            "#,
            table = self.table,
            columns = COLUMNS
        );

        sqlx::query(&sql)
            .bind(email.id)
            .bind(&email.subject)
            .bind(&email.markdown_content)
            .bind(&email.html_content)
            .bind(Json(&email.recipients))
            .bind(Json(&email.variables))
            .bind(&email.template_used)
            .bind(email.status.as_str())
            .bind(email.error_message.as_deref())
            .bind(email.sent_at)
            .bind(email.created_at)
            .bind(email.updated_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!(email_id = %email.id, "Email stored in PostgreSQL");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<MarkdownEmail, StoreError> {
        let sql = format!(
            "SELECT {columns} FROM {table} WHERE id = $1",
            columns = COLUMNS,
            table = self.table
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        email_from_row(&row)
    }

    async fn mark_sent(&self, id: Uuid) -> Result<MarkdownEmail, StoreError> {
        self.update_status(id, EmailStatus::Sent, None).await
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        error_message: &str,
    ) -> Result<MarkdownEmail, StoreError> {
        self.update_status(id, EmailStatus::Failed, Some(error_message))
            .await
    }

    async fn list(&self, status: Option<EmailStatus>) -> Result<Vec<MarkdownEmail>, StoreError> {
        let sql = format!(
            r#"
            SELECT {columns} FROM {table}
            WHERE $1::TEXT IS NULL OR status = $1
            ORDER BY created_at DESC
            "#,
            columns = COLUMNS,
            table = self.table
        );

        let rows = sqlx::query(&sql)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(email_from_row).collect()
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(count.max(0) as usize)
    }
}
