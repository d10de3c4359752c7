mod settings;

pub use settings::{
    ApiConfig, DatabaseConfig, LinksConfig, LogFormat, LoggingConfig, MarkdownConfig,
    SecurityConfig, ServerConfig, Settings, TemplateConfig,
};
