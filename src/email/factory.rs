//! Email store factory

use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::postgres::PostgresPool;

use super::memory_store::MemoryEmailStore;
use super::postgres_store::PostgresEmailStore;
use super::store::EmailStore;

/// Create an email store based on configuration.
///
/// Returns the appropriate backend implementation based on the `backend` setting:
/// - `"postgres"`: Returns a `PostgresEmailStore` if a PostgreSQL pool is provided
///   and the table can be prepared
/// - `"memory"` (default): Returns a `MemoryEmailStore`
///
/// Any failure on the postgres path falls back to memory with a warning.
///
/// # Example
///
/// ```rust,ignore
/// let store = create_email_store(&settings.database, Some(pg_pool.clone())).await;
/// ```
pub async fn create_email_store(
    settings: &DatabaseConfig,
    postgres_pool: Option<Arc<PostgresPool>>,
) -> Arc<dyn EmailStore> {
    match settings.backend.as_str() {
        "postgres" => {
            let Some(pool) = postgres_pool else {
                tracing::warn!(
                    "PostgreSQL backend requested but no pool provided, falling back to memory"
                );
                return Arc::new(MemoryEmailStore::new());
            };

            let store = match PostgresEmailStore::new(pool.pool().clone(), &settings.table_name) {
                Ok(store) => store,
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid PostgreSQL store settings, falling back to memory");
                    return Arc::new(MemoryEmailStore::new());
                }
            };

            if let Err(e) = store.ensure_schema().await {
                tracing::warn!(error = %e, "Failed to prepare email table, falling back to memory");
                return Arc::new(MemoryEmailStore::new());
            }

            tracing::info!(
                backend = "postgres",
                table = %settings.table_name,
                "Creating PostgreSQL email store"
            );
            Arc::new(store)
        }
        other => {
            if other != "memory" {
                tracing::warn!(backend = %other, "Unknown email store backend, using memory");
            }
            tracing::info!(backend = "memory", "Creating memory email store");
            Arc::new(MemoryEmailStore::new())
        }
    }
}
