//! Render types and error definitions

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::converter::ConversionError;
use super::layout::LayoutError;

/// Render-specific error type
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(
        "Failed to render markdown email: missing variables: {}. Found placeholders: {}. Provided variables: {}",
        .missing.join(", "),
        .found.join(", "),
        .provided.join(", ")
    )]
    MissingVariables {
        missing: Vec<String>,
        found: Vec<String>,
        provided: Vec<String>,
    },

    #[error("Failed to render markdown email: missing template parameter: {0}")]
    MissingTemplateParameter(String),

    #[error("Failed to render markdown email: {0}")]
    ConversionFailure(#[from] ConversionError),

    #[error("Failed to render markdown email: {0}")]
    TemplateRenderFailure(#[from] LayoutError),
}

impl RenderError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::MissingVariables { .. } => "MISSING_VARIABLES",
            RenderError::MissingTemplateParameter(_) => "MISSING_TEMPLATE_PARAMETER",
            RenderError::ConversionFailure(_) => "CONVERSION_FAILED",
            RenderError::TemplateRenderFailure(_) => "TEMPLATE_RENDER_FAILED",
        }
    }
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// A variable value: text or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl VariableValue {
    /// The value as text, if it is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VariableValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a non-negative integer, accepting numeric text
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            VariableValue::Integer(n) => u32::try_from(*n).ok(),
            VariableValue::Float(_) => None,
            VariableValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Integer(n) => write!(f, "{}", n),
            VariableValue::Float(n) => write!(f, "{}", n),
            VariableValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        VariableValue::Text(value.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        VariableValue::Text(value)
    }
}

impl From<i64> for VariableValue {
    fn from(value: i64) -> Self {
        VariableValue::Integer(value)
    }
}

impl From<i32> for VariableValue {
    fn from(value: i32) -> Self {
        VariableValue::Integer(value.into())
    }
}

impl From<u32> for VariableValue {
    fn from(value: u32) -> Self {
        VariableValue::Integer(value.into())
    }
}

impl From<f64> for VariableValue {
    fn from(value: f64) -> Self {
        VariableValue::Float(value)
    }
}

/// Named variables available to a markdown template
pub type Variables = BTreeMap<String, VariableValue>;

/// Input to the render pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct RenderRequest {
    /// Markdown source with {{ variable }} placeholders
    pub markdown: String,

    /// Variable values (optional, defaults to empty)
    #[serde(default)]
    pub variables: Variables,

    /// Layout identifier (optional, defaults to the configured base view)
    #[serde(default)]
    pub template: Option<String>,
}

/// A footer link shown by the layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterLink {
    pub label: String,
    pub url: String,
}

/// Everything a layout needs to produce the final document
#[derive(Debug, Clone, Serialize)]
pub struct TemplateParameters {
    /// Rendered (and optionally filtered) HTML body
    pub content: String,

    pub business_name: String,

    /// Logo URL; empty means no logo image
    pub logo_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_height: Option<u32>,

    /// Only links with a non-empty URL
    pub footer_links: Vec<FooterLink>,

    /// Variables as supplied by the caller
    pub raw_variables: Variables,
}
