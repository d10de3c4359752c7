//! PostgreSQL persistence module.
//!
//! Provides connection pooling for the PostgreSQL email store.

pub mod pool;

pub use pool::{PostgresPool, PostgresPoolError};
