//! Backend trait for email record storage.
//!
//! This module defines the abstraction layer for email storage backends,
//! allowing different implementations (memory, PostgreSQL) to be used
//! interchangeably.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::model::{EmailStatus, MarkdownEmail};

/// Errors that can occur during email store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this ID
    #[error("Email not found: {0}")]
    NotFound(Uuid),

    /// PostgreSQL operation failed
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// Configured table name is not a plain identifier
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    /// Stored data could not be interpreted
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Persistence for rendered emails and their status lifecycle.
#[async_trait]
pub trait EmailStore: Send + Sync {
    /// Backend type identifier
    fn backend_type(&self) -> &'static str;

    /// Insert or replace a record
    async fn save(&self, email: &MarkdownEmail) -> Result<(), StoreError>;

    /// Fetch a record by ID
    async fn get(&self, id: Uuid) -> Result<MarkdownEmail, StoreError>;

    /// Mark a record as sent and return the updated record
    async fn mark_sent(&self, id: Uuid) -> Result<MarkdownEmail, StoreError>;

    /// Mark a record as failed and return the updated record
    async fn mark_failed(&self, id: Uuid, error_message: &str)
        -> Result<MarkdownEmail, StoreError>;

    /// List records, newest first, optionally restricted to one status
    async fn list(&self, status: Option<EmailStatus>) -> Result<Vec<MarkdownEmail>, StoreError>;

    /// Number of stored records
    async fn count(&self) -> Result<usize, StoreError>;
}
