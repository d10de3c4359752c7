//! Markdown email rendering.
//!
//! This module provides:
//! - Variable placeholders (`{{ name }}`) with strict validation
//! - Markdown conversion through comrak with configurable extensions
//! - Optional allow-list HTML filtering of the converted content
//! - Outer layouts that wrap the content into a complete email document
//!
//! # Example
//!
//! ```ignore
//! let renderer = MarkdownEmailRenderer::new(&settings);
//!
//! let mut variables = Variables::new();
//! variables.insert("name".to_string(), "John".into());
//!
//! let html = renderer.render("Hello {{ name }}!", &variables, None)?;
//! assert!(html.contains("Hello John!"));
//! ```

mod converter;
mod layout;
mod renderer;
mod types;
mod variables;

pub use converter::{
    ComrakConverter, ConversionError, MarkdownConverter, MarkdownExtension, RawHtmlPolicy,
};
pub use layout::{BaseLayout, Layout, LayoutError, LayoutRegistry, BASE_LAYOUT};
pub use renderer::{
    MarkdownEmailRenderer, BUSINESS_NAME_VAR, LOGO_HEIGHT_VAR, LOGO_URL_VAR, LOGO_WIDTH_VAR,
};
pub use types::{
    FooterLink, RenderError, RenderRequest, RenderResult, TemplateParameters, VariableValue,
    Variables,
};
pub use variables::{find_placeholders, substitute_variables, validate_variables};
