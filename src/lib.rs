// Shared components
pub mod config;
pub mod error;
pub mod postgres;
pub mod telemetry;

// Rendering core
pub mod button;
pub mod render;
pub mod sanitize;

// Stored emails
pub mod email;

// Application layer
pub mod api;
pub mod server;
