//! In-memory email store using DashMap.
//!
//! Records are lost on service restart.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::model::{EmailStatus, MarkdownEmail};
use super::store::{EmailStore, StoreError};

/// In-memory email store.
pub struct MemoryEmailStore {
    emails: DashMap<Uuid, MarkdownEmail>,
}

impl Default for MemoryEmailStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEmailStore {
    pub fn new() -> Self {
        Self {
            emails: DashMap::new(),
        }
    }

    fn update<F>(&self, id: Uuid, apply: F) -> Result<MarkdownEmail, StoreError>
    where
        F: FnOnce(&mut MarkdownEmail),
    {
        let mut entry = self.emails.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        apply(entry.value_mut());
        Ok(entry.value().clone())
    }
}

#[async_trait]
impl EmailStore for MemoryEmailStore {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn save(&self, email: &MarkdownEmail) -> Result<(), StoreError> {
        self.emails.insert(email.id, email.clone());

        tracing::debug!(email_id = %email.id, "Email stored in memory");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<MarkdownEmail, StoreError> {
        self.emails
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn mark_sent(&self, id: Uuid) -> Result<MarkdownEmail, StoreError> {
        self.update(id, |email| email.mark_sent())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        error_message: &str,
    ) -> Result<MarkdownEmail, StoreError> {
        self.update(id, |email| email.mark_failed(error_message))
    }

    async fn list(&self, status: Option<EmailStatus>) -> Result<Vec<MarkdownEmail>, StoreError> {
        let mut emails: Vec<MarkdownEmail> = self
            .emails
            .iter()
            .filter(|entry| status.map_or(true, |s| entry.status == s))
            .map(|entry| entry.value().clone())
            .collect();

        emails.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(emails)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.emails.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::model::sample_email;

    #[tokio::test]
    async fn test_save_and_get() {
        let store = MemoryEmailStore::new();
        let email = sample_email();

        store.save(&email).await.unwrap();
        let fetched = store.get(email.id).await.unwrap();
        assert_eq!(fetched, email);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryEmailStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.get(id).await,
            Err(StoreError::NotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_mark_sent_and_failed() {
        let store = MemoryEmailStore::new();
        let sent = sample_email();
        let failed = sample_email();
        store.save(&sent).await.unwrap();
        store.save(&failed).await.unwrap();

        let updated = store.mark_sent(sent.id).await.unwrap();
        assert_eq!(updated.status, EmailStatus::Sent);
        assert!(updated.sent_at.is_some());

        let updated = store.mark_failed(failed.id, "SMTP timeout").await.unwrap();
        assert_eq!(updated.status, EmailStatus::Failed);
        assert_eq!(updated.error_message.as_deref(), Some("SMTP timeout"));

        assert!(matches!(
            store.mark_sent(Uuid::new_v4()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let store = MemoryEmailStore::new();
        let draft = sample_email();
        let sent = sample_email();
        let failed = sample_email();
        for email in [&draft, &sent, &failed] {
            store.save(email).await.unwrap();
        }
        store.mark_sent(sent.id).await.unwrap();
        store.mark_failed(failed.id, "bounced").await.unwrap();

        let sent_list = store.list(Some(EmailStatus::Sent)).await.unwrap();
        assert_eq!(sent_list.len(), 1);
        assert_eq!(sent_list[0].id, sent.id);

        let failed_list = store.list(Some(EmailStatus::Failed)).await.unwrap();
        assert_eq!(failed_list.len(), 1);
        assert_eq!(failed_list[0].id, failed.id);

        assert_eq!(store.list(None).await.unwrap().len(), 3);
    }
}
