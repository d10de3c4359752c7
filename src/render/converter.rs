//! Markdown to HTML conversion.
//!
//! The markdown grammar is delegated to comrak. This module only decides which
//! extensions are enabled and how raw HTML in the source is treated.

use comrak::{markdown_to_html, Options};
use serde::Deserialize;
use thiserror::Error;

/// Error raised by a markdown converter
#[derive(Debug, Error)]
#[error("Markdown conversion failed: {0}")]
pub struct ConversionError(pub String);

/// Converts markdown source to an HTML fragment
pub trait MarkdownConverter: Send + Sync {
    fn convert(&self, markdown: &str) -> Result<String, ConversionError>;
}

/// Optional markdown syntax extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkdownExtension {
    Table,
    Strikethrough,
    Autolink,
}

/// How raw HTML embedded in markdown is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawHtmlPolicy {
    /// Omit raw HTML from the output
    #[default]
    Strip,
    /// Render raw HTML as escaped text
    Escape,
    /// Pass raw HTML (and links with any scheme) through untouched
    Allow,
}

/// comrak-backed converter, configured once at construction
#[derive(Debug, Clone)]
pub struct ComrakConverter {
    extensions: Vec<MarkdownExtension>,
    html_policy: RawHtmlPolicy,
}

impl ComrakConverter {
    pub fn new(enabled: &[MarkdownExtension], html_policy: RawHtmlPolicy) -> Self {
        let mut extensions: Vec<MarkdownExtension> = Vec::with_capacity(enabled.len());
        for extension in enabled {
            if !extensions.contains(extension) {
                extensions.push(*extension);
            }
        }

        tracing::debug!(
            extensions = ?extensions,
            html_policy = ?html_policy,
            "Markdown converter configured"
        );

        Self {
            extensions,
            html_policy,
        }
    }

    pub fn extensions(&self) -> &[MarkdownExtension] {
        &self.extensions
    }

    pub fn html_policy(&self) -> RawHtmlPolicy {
        self.html_policy
    }

    fn configure(&self, options: &mut Options) {
        for extension in &self.extensions {
            match extension {
                MarkdownExtension::Table => options.extension.table = true,
                MarkdownExtension::Strikethrough => options.extension.strikethrough = true,
                MarkdownExtension::Autolink => options.extension.autolink = true,
            }
        }

        // Unsafe links (javascript:, vbscript:, file:, most data:) are only
        // rendered when raw HTML is explicitly allowed.
        match self.html_policy {
            RawHtmlPolicy::Strip => {}
            RawHtmlPolicy::Escape => options.render.escape = true,
            RawHtmlPolicy::Allow => options.render.r#unsafe = true,
        }
    }
}

impl Default for ComrakConverter {
    fn default() -> Self {
        Self::new(
            &[
                MarkdownExtension::Table,
                MarkdownExtension::Strikethrough,
                MarkdownExtension::Autolink,
            ],
            RawHtmlPolicy::Strip,
        )
    }
}

impl MarkdownConverter for ComrakConverter {
    fn convert(&self, markdown: &str) -> Result<String, ConversionError> {
        let mut options = Options::default();
        self.configure(&mut options);
        Ok(markdown_to_html(markdown, &options))
    }
}
