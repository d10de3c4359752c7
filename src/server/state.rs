use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::email::{EmailEventBus, EmailService, EmailStore, MemoryEmailStore};
use crate::postgres::PostgresPool;
use crate::render::MarkdownEmailRenderer;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub renderer: Arc<MarkdownEmailRenderer>,
    pub email_service: Arc<EmailService>,
    pub postgres_pool: Option<Arc<PostgresPool>>,
    pub start_time: Instant,
}

impl AppState {
    /// State backed by an in-memory store
    pub fn new(settings: Settings) -> Self {
        Self::with_store(settings, Arc::new(MemoryEmailStore::new()), None)
    }

    pub fn with_store(
        settings: Settings,
        store: Arc<dyn EmailStore>,
        postgres_pool: Option<Arc<PostgresPool>>,
    ) -> Self {
        let renderer = Arc::new(MarkdownEmailRenderer::new(&settings));
        let email_service = Arc::new(EmailService::new(
            renderer.clone(),
            store,
            EmailEventBus::default(),
            settings.logging.clone(),
            settings.database.store_emails,
        ));

        Self {
            settings: Arc::new(settings),
            renderer,
            email_service,
            postgres_pool,
            start_time: Instant::now(),
        }
    }
}
