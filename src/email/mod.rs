//! Stored markdown emails.
//!
//! An email is rendered once at creation and kept as a draft; callers that
//! deliver it report back through `mark_sent` / `mark_failed`. Storage is
//! pluggable:
//! - `memory`: Fast, not persistent (default)
//! - `postgres`: Persistent, JSONB columns for recipients and variables

mod events;
mod factory;
mod memory_store;
mod model;
mod postgres_store;
mod service;
mod store;

pub use events::{EmailEvent, EmailEventBus};
pub use factory::create_email_store;
pub use memory_store::MemoryEmailStore;
pub use model::{EmailStatus, MarkdownEmail, NewEmail};
pub use postgres_store::PostgresEmailStore;
pub use service::{CreateEmail, EmailError, EmailService, EmailStats, EmailStatsSnapshot};
pub use store::{EmailStore, StoreError};
