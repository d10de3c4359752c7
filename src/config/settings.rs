use std::collections::HashMap;
use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::button::{default_button_presets, ButtonStyle};
use crate::render::{MarkdownExtension, RawHtmlPolicy, BASE_LAYOUT};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Button style presets keyed by button type (or any custom key)
    #[serde(default = "default_button_presets")]
    pub buttons: HashMap<String, ButtonStyle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Shared secret expected in `X-API-Key`; unset disables the check
    #[serde(default)]
    pub key: Option<String>,
}

/// Branding passed to the outer layout
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    #[serde(default = "default_business_name")]
    pub business_name: Option<String>,
    #[serde(default = "default_logo_url")]
    pub logo_url: Option<String>,
    #[serde(default = "default_logo_width")]
    pub logo_width: Option<u32>,
    #[serde(default = "default_logo_height")]
    pub logo_height: Option<u32>,
    /// Layout used when a render does not name one
    #[serde(default = "default_base_view")]
    pub base_view: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Storage backend: "memory" or "postgres"
    #[serde(default = "default_database_backend")]
    pub backend: String,
    /// PostgreSQL connection URL (required for the postgres backend)
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_table_name")]
    pub table_name: String,
    /// Persist created emails
    #[serde(default = "default_true")]
    pub store_emails: bool,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Apply the allow-list tag filter to converted markdown
    #[serde(default = "default_true")]
    pub sanitize_content: bool,
    #[serde(default = "default_allowed_html_tags")]
    pub allowed_html_tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<MarkdownExtension>,
    /// Treatment of raw HTML in markdown source
    #[serde(default)]
    pub html_input: RawHtmlPolicy,
}

/// Footer links; a link is only rendered when its URL is set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinksConfig {
    #[serde(default)]
    pub unsubscribe_url: Option<String>,
    #[serde(default)]
    pub privacy_policy_url: Option<String>,
    #[serde(default)]
    pub terms_of_service_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log email failures
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Channel name attached to email log records
    #[serde(default = "default_log_channel")]
    pub channel: String,
    /// Include markdown content in email log records
    #[serde(default)]
    pub log_content: bool,
    #[serde(default)]
    pub format: LogFormat,
    /// Default filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_body_limit() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_business_name() -> Option<String> {
    Some("Your Business Name".to_string())
}

fn default_logo_url() -> Option<String> {
    Some("/images/logo.png".to_string())
}

fn default_logo_width() -> Option<u32> {
    Some(200)
}

fn default_logo_height() -> Option<u32> {
    Some(80)
}

fn default_base_view() -> String {
    BASE_LAYOUT.to_string()
}

fn default_database_backend() -> String {
    "memory".to_string()
}

fn default_table_name() -> String {
    "markdown_emails".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_idle_timeout() -> u64 {
    600 // 10 minutes
}

fn default_true() -> bool {
    true
}

fn default_allowed_html_tags() -> Vec<String> {
    [
        "p", "br", "strong", "em", "u", "a", "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

fn default_markdown_extensions() -> Vec<MarkdownExtension> {
    vec![
        MarkdownExtension::Table,
        MarkdownExtension::Strikethrough,
        MarkdownExtension::Autolink,
    ]
}

fn default_log_channel() -> String {
    "default".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", 8082)?
            .set_default("database.backend", default_database_backend())?
            .set_default("template.base_view", default_base_view())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT, APP__TEMPLATE__BUSINESS_NAME, APP__DATABASE__URL, etc.
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("security.allowed_html_tags")
                    .with_list_parse_key("markdown.extensions"),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            template: TemplateConfig::default(),
            database: DatabaseConfig::default(),
            security: SecurityConfig::default(),
            markdown: MarkdownConfig::default(),
            links: LinksConfig::default(),
            logging: LoggingConfig::default(),
            buttons: default_button_presets(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            business_name: default_business_name(),
            logo_url: default_logo_url(),
            logo_width: default_logo_width(),
            logo_height: default_logo_height(),
            base_view: default_base_view(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_database_backend(),
            url: None,
            table_name: default_table_name(),
            store_emails: true,
            pool_size: default_pool_size(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            sanitize_content: true,
            allowed_html_tags: default_allowed_html_tags(),
        }
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_markdown_extensions(),
            html_input: RawHtmlPolicy::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel: default_log_channel(),
            log_content: false,
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}
