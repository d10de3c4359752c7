//! Outer email layouts.
//!
//! A layout receives the rendered content plus [`TemplateParameters`] and
//! produces the complete HTML document. Layouts are looked up by identifier in
//! a [`LayoutRegistry`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use thiserror::Error;

use crate::sanitize::escape_html;

use super::types::TemplateParameters;

/// Identifier of the built-in layout
pub const BASE_LAYOUT: &str = "base-template";

/// Layout-specific error type
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering failed: {0}")]
    Failed(String),
}

/// Produces a full HTML document from template parameters
pub trait Layout: Send + Sync {
    fn render(&self, params: &TemplateParameters) -> Result<String, LayoutError>;
}

/// Layouts keyed by template identifier
#[derive(Clone)]
pub struct LayoutRegistry {
    layouts: HashMap<String, Arc<dyn Layout>>,
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutRegistry {
    /// Create a registry containing only the built-in base layout
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(BASE_LAYOUT, Arc::new(BaseLayout));
        registry
    }

    /// Create a registry with no layouts
    pub fn empty() -> Self {
        Self {
            layouts: HashMap::new(),
        }
    }

    /// Register (or replace) a layout under `name`
    pub fn register(&mut self, name: impl Into<String>, layout: Arc<dyn Layout>) {
        self.layouts.insert(name.into(), layout);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// Render `params` with the layout registered under `name`
    pub fn render(&self, name: &str, params: &TemplateParameters) -> Result<String, LayoutError> {
        let layout = self
            .layouts
            .get(name)
            .ok_or_else(|| LayoutError::NotFound(name.to_string()))?;
        layout.render(params)
    }
}

impl std::fmt::Debug for LayoutRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.layouts.keys().collect();
        names.sort();
        f.debug_struct("LayoutRegistry").field("layouts", &names).finish()
    }
}

const BASE_STYLES: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; background-color: #f9f9f9; }
        .email-container { background-color: white; border-radius: 8px; padding: 30px; box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1); }
        .header { text-align: center; margin-bottom: 30px; padding-bottom: 20px; border-bottom: 2px solid #f0f0f0; }
        .logo { height: auto; margin-bottom: 10px; }
        .business-name { font-size: 24px; font-weight: bold; color: #2c3e50; margin: 0; }
        .content { margin-bottom: 30px; }
        .content h1 { color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 10px; }
        .content h2 { color: #34495e; margin-top: 25px; }
        .content p, .content ul, .content ol { margin-bottom: 15px; }
        .content ul, .content ol { padding-left: 20px; }
        .content blockquote { border-left: 4px solid #3498db; padding-left: 15px; margin-left: 0; font-style: italic; color: #7f8c8d; }
        .content table { width: 100%; border-collapse: collapse; margin-bottom: 20px; border: 1px solid #ddd; }
        .content th, .content td { padding: 12px; text-align: center; border-bottom: 1px solid #ddd; border-right: 1px solid #ddd; }
        .content th { background-color: #f8f9fa; font-weight: bold; }
        .footer { text-align: center; padding-top: 20px; border-top: 1px solid #e0e0e0; font-size: 12px; color: #7f8c8d; }
        .footer-links { margin-bottom: 15px; }
        .footer-links a { color: #3498db; text-decoration: none; margin: 0 10px; }
        @media only screen and (max-width: 600px) {
            body { padding: 10px; }
            .email-container { padding: 20px; }
            .logo { max-width: 150px; }
            .business-name { font-size: 20px; }
        }
"#;

/// Built-in responsive email layout with header, content and footer
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseLayout;

impl Layout for BaseLayout {
    fn render(&self, params: &TemplateParameters) -> Result<String, LayoutError> {
        let business_name = escape_html(&params.business_name);

        let logo_style = params
            .logo_width
            .map(|w| format!("        .logo {{ max-width: {}px; }}\n", w))
            .unwrap_or_default();

        let logo = if params.logo_url.is_empty() {
            String::new()
        } else {
            let mut img = format!(
                r#"<img src="{}" alt="{} Logo" class="logo""#,
                escape_html(&params.logo_url),
                business_name
            );
            if let Some(width) = params.logo_width {
                img.push_str(&format!(r#" width="{}""#, width));
            }
            if let Some(height) = params.logo_height {
                img.push_str(&format!(r#" height="{}""#, height));
            }
            img.push('>');
            img
        };

        let footer_links: Vec<String> = params
            .footer_links
            .iter()
            .filter(|link| !link.url.is_empty())
            .map(|link| {
                format!(
                    r#"<a href="{}">{}</a>"#,
                    escape_html(&link.url),
                    escape_html(&link.label)
                )
            })
            .collect();

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{business_name}</title>
    <style>{styles}{logo_style}    </style>
</head>
<body>
    <div class="email-container">
        <div class="header">
            {logo}
            <h1 class="business-name">{business_name}</h1>
        </div>
        <div class="content">
{content}
        </div>
        <div class="footer">
            <div class="footer-links">{links}</div>
            <p>&copy; {year} {business_name}. All rights reserved.</p>
        </div>
    </div>
</body>
</html>
"#,
            business_name = business_name,
            styles = BASE_STYLES,
            logo_style = logo_style,
            logo = logo,
            content = params.content,
            links = footer_links.join("\n                "),
            year = Utc::now().year(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FooterLink, Variables};

    fn params() -> TemplateParameters {
        TemplateParameters {
            content: "<p>Hello <strong>there</strong></p>".to_string(),
            business_name: "Test & Co".to_string(),
            logo_url: "https://example.com/logo.png".to_string(),
            logo_width: Some(200),
            logo_height: Some(80),
            footer_links: vec![FooterLink {
                label: "Unsubscribe".to_string(),
                url: "https://example.com/unsubscribe".to_string(),
            }],
            raw_variables: Variables::new(),
        }
    }

    #[test]
    fn test_base_layout_structure() {
        let html = BaseLayout.render(&params()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<p>Hello <strong>there</strong></p>"));
        assert!(html.contains("<title>Test &amp; Co</title>"));
        assert!(html.contains(r#"src="https://example.com/logo.png""#));
        assert!(html.contains(r#"width="200""#));
        assert!(html.contains(r#"height="80""#));
        assert!(html.contains(r#"<a href="https://example.com/unsubscribe">Unsubscribe</a>"#));
        assert!(html.contains(&format!("&copy; {} Test &amp; Co", Utc::now().year())));
    }

    #[test]
    fn test_base_layout_without_logo_or_links() {
        let mut p = params();
        p.logo_url = String::new();
        p.logo_width = None;
        p.logo_height = None;
        p.footer_links.clear();

        let html = BaseLayout.render(&p).unwrap();
        assert!(!html.contains("<img"));
        assert!(!html.contains("max-width: 200px"));
        assert!(html.contains(r#"<div class="footer-links"></div>"#));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = LayoutRegistry::new();
        assert!(registry.contains(BASE_LAYOUT));
        assert!(registry.render(BASE_LAYOUT, &params()).is_ok());
        assert!(matches!(
            registry.render("missing", &params()),
            Err(LayoutError::NotFound(name)) if name == "missing"
        ));
    }

    struct ContentOnly;

    impl Layout for ContentOnly {
        fn render(&self, params: &TemplateParameters) -> Result<String, LayoutError> {
            Ok(params.content.clone())
        }
    }

    #[test]
    fn test_registry_custom_layout() {
        let mut registry = LayoutRegistry::empty();
        registry.register("plain", Arc::new(ContentOnly));
        assert_eq!(
            registry.render("plain", &params()).unwrap(),
            "<p>Hello <strong>there</strong></p>"
        );
        assert!(!registry.contains(BASE_LAYOUT));
    }
}
