//! The markdown email render pipeline

use std::sync::Arc;

use crate::config::{LinksConfig, SecurityConfig, Settings, TemplateConfig};
use crate::sanitize::{filter_tags, sanitize_url};

use super::converter::{ComrakConverter, MarkdownConverter};
use super::layout::LayoutRegistry;
use super::types::{
    FooterLink, RenderError, RenderRequest, RenderResult, TemplateParameters, Variables,
};
use super::variables::{substitute_variables, validate_variables};

/// Variable that overrides the configured business name
pub const BUSINESS_NAME_VAR: &str = "business_name";
/// Variable that overrides the configured logo URL
pub const LOGO_URL_VAR: &str = "logo_url";
/// Variable that overrides the configured logo width
pub const LOGO_WIDTH_VAR: &str = "logo_width";
/// Variable that overrides the configured logo height
pub const LOGO_HEIGHT_VAR: &str = "logo_height";

/// Renders markdown plus variables into a complete HTML email.
///
/// Immutable after construction and safe to share between threads.
pub struct MarkdownEmailRenderer {
    template: TemplateConfig,
    security: SecurityConfig,
    links: LinksConfig,
    converter: Arc<dyn MarkdownConverter>,
    layouts: LayoutRegistry,
}

impl MarkdownEmailRenderer {
    /// Create a renderer from settings, using comrak and the built-in layouts
    pub fn new(settings: &Settings) -> Self {
        let converter = ComrakConverter::new(
            &settings.markdown.extensions,
            settings.markdown.html_input,
        );

        Self {
            template: settings.template.clone(),
            security: settings.security.clone(),
            links: settings.links.clone(),
            converter: Arc::new(converter),
            layouts: LayoutRegistry::new(),
        }
    }

    /// Replace the markdown converter
    pub fn with_converter(mut self, converter: Arc<dyn MarkdownConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Replace the layout registry
    pub fn with_layouts(mut self, layouts: LayoutRegistry) -> Self {
        self.layouts = layouts;
        self
    }

    /// Layout used when a render does not name one
    pub fn default_template(&self) -> &str {
        &self.template.base_view
    }

    /// Render a [`RenderRequest`]
    pub fn render_request(&self, request: &RenderRequest) -> RenderResult<String> {
        self.render(
            &request.markdown,
            &request.variables,
            request.template.as_deref(),
        )
    }

    /// Render markdown with variables into the named (or default) layout.
    ///
    /// Fails before conversion if any placeholder has no variable.
    pub fn render(
        &self,
        markdown: &str,
        variables: &Variables,
        template: Option<&str>,
    ) -> RenderResult<String> {
        validate_variables(markdown, variables)?;

        let processed = substitute_variables(markdown, variables);
        let html = self.converter.convert(&processed)?;

        let content = if self.security.sanitize_content {
            filter_tags(&html, &self.security.allowed_html_tags)
        } else {
            html
        };

        let params = self.template_parameters(content, variables)?;
        let layout = template.unwrap_or(&self.template.base_view);

        let document = self.layouts.render(layout, &params)?;

        tracing::debug!(
            layout = %layout,
            variables = variables.len(),
            bytes = document.len(),
            "Markdown email rendered"
        );

        Ok(document)
    }

    /// Assemble layout parameters for already-rendered content
    pub fn template_parameters(
        &self,
        content: String,
        variables: &Variables,
    ) -> RenderResult<TemplateParameters> {
        let business_name = resolve_text(
            variables,
            BUSINESS_NAME_VAR,
            self.template.business_name.as_deref(),
        )
        .ok_or_else(|| RenderError::MissingTemplateParameter(BUSINESS_NAME_VAR.to_string()))?;

        let logo_url = resolve_text(variables, LOGO_URL_VAR, self.template.logo_url.as_deref())
            .map(|url| sanitize_url(&url))
            .ok_or_else(|| RenderError::MissingTemplateParameter(LOGO_URL_VAR.to_string()))?;

        let logo_width = variables
            .get(LOGO_WIDTH_VAR)
            .and_then(|v| v.as_u32())
            .or(self.template.logo_width);

        let logo_height = variables
            .get(LOGO_HEIGHT_VAR)
            .and_then(|v| v.as_u32())
            .or(self.template.logo_height);

        Ok(TemplateParameters {
            content,
            business_name,
            logo_url,
            logo_width,
            logo_height,
            footer_links: self.footer_links(),
            raw_variables: variables.clone(),
        })
    }

    fn footer_links(&self) -> Vec<FooterLink> {
        [
            ("Unsubscribe", &self.links.unsubscribe_url),
            ("Privacy Policy", &self.links.privacy_policy_url),
            ("Terms of Service", &self.links.terms_of_service_url),
        ]
        .into_iter()
        .filter_map(|(label, url)| {
            let url = url.as_deref()?.trim();
            if url.is_empty() {
                return None;
            }
            Some(FooterLink {
                label: label.to_string(),
                url: sanitize_url(url),
            })
        })
        .collect()
    }
}

/// A variable's text, falling back to configuration; empty counts as absent
fn resolve_text(variables: &Variables, key: &str, fallback: Option<&str>) -> Option<String> {
    variables
        .get(key)
        .map(|v| v.to_string())
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            fallback
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        })
}
