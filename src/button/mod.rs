//! Call-to-action buttons.
//!
//! Buttons are anchors with inline styles, since most email clients ignore
//! stylesheet classes. Styles come from named presets; every preset value is
//! untrusted and passes through the CSS sanitizer, and the target URL through
//! the URL guard.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sanitize::{escape_html, sanitize_css_value, sanitize_url};

const DEFAULT_PADDING: &str = "12px 24px";
const DEFAULT_TEXT_COLOR: &str = "white";
const DEFAULT_BACKGROUND_COLOR: &str = "#3498db";
const DEFAULT_BORDER_RADIUS: &str = "5px";
const DEFAULT_FONT_WEIGHT: &str = "bold";
const DEFAULT_MARGIN: &str = "10px 0";

/// Declarations that are always appended and never configurable
const FIXED_DECLARATIONS: [&str; 3] = [
    "display: inline-block",
    "text-decoration: none",
    "text-align: center",
];

/// Recognized button variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonType {
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    Custom,
}

impl ButtonType {
    pub const ALL: [ButtonType; 6] = [
        ButtonType::Primary,
        ButtonType::Secondary,
        ButtonType::Success,
        ButtonType::Danger,
        ButtonType::Warning,
        ButtonType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonType::Primary => "primary",
            ButtonType::Secondary => "secondary",
            ButtonType::Success => "success",
            ButtonType::Danger => "danger",
            ButtonType::Warning => "warning",
            ButtonType::Custom => "custom",
        }
    }

    /// Parse a preset key. Unrecognized keys yield `None`; callers render them
    /// with the primary preset instead of failing.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == key)
    }
}

impl fmt::Display for ButtonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw (unsanitized) style values of a button preset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonStyle {
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub padding: Option<String>,
    #[serde(default)]
    pub border_radius: Option<String>,
    #[serde(default)]
    pub font_weight: Option<String>,
    #[serde(default)]
    pub margin: Option<String>,
}

impl ButtonStyle {
    fn with_colors(background: &str, text: &str) -> Self {
        Self {
            background_color: Some(background.to_string()),
            text_color: Some(text.to_string()),
            ..Default::default()
        }
    }

    /// Inline style attribute value: six sanitized declarations followed by
    /// the fixed ones, joined with `; ` and terminated by `;`.
    pub fn to_inline_style(&self) -> String {
        let configurable = [
            ("padding", &self.padding, DEFAULT_PADDING),
            ("color", &self.text_color, DEFAULT_TEXT_COLOR),
            ("background-color", &self.background_color, DEFAULT_BACKGROUND_COLOR),
            ("border-radius", &self.border_radius, DEFAULT_BORDER_RADIUS),
            ("font-weight", &self.font_weight, DEFAULT_FONT_WEIGHT),
            ("margin", &self.margin, DEFAULT_MARGIN),
        ];

        let mut declarations: Vec<String> = configurable
            .iter()
            .map(|(property, value, default)| {
                let value = value
                    .as_deref()
                    .map(sanitize_css_value)
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| default.to_string());
                format!("{}: {}", property, value)
            })
            .collect();
        declarations.extend(FIXED_DECLARATIONS.iter().map(|d| d.to_string()));

        format!("{};", declarations.join("; "))
    }
}

/// Built-in presets for the named button types
pub fn default_button_presets() -> HashMap<String, ButtonStyle> {
    HashMap::from([
        (
            ButtonType::Primary.to_string(),
            ButtonStyle::with_colors("#3498db", "white"),
        ),
        (
            ButtonType::Secondary.to_string(),
            ButtonStyle::with_colors("#95a5a6", "white"),
        ),
        (
            ButtonType::Success.to_string(),
            ButtonStyle::with_colors("#27ae60", "white"),
        ),
        (
            ButtonType::Danger.to_string(),
            ButtonStyle::with_colors("#e74c3c", "white"),
        ),
        (
            ButtonType::Warning.to_string(),
            ButtonStyle::with_colors("#f39c12", "white"),
        ),
    ])
}

/// Resolve a preset: the requested key, then `primary`, then an empty preset
pub fn resolve_preset<'a>(
    type_key: &str,
    presets: &'a HashMap<String, ButtonStyle>,
) -> Option<&'a ButtonStyle> {
    presets
        .get(type_key)
        .or_else(|| presets.get(ButtonType::Primary.as_str()))
}

/// Build a styled anchor for `text` pointing at `url`.
///
/// Never fails: an unsafe URL becomes `#`, hostile style values are stripped,
/// and an unknown type renders with the primary preset.
pub fn build_button(
    text: &str,
    url: &str,
    type_key: &str,
    presets: &HashMap<String, ButtonStyle>,
) -> String {
    let empty = ButtonStyle::default();
    let style = resolve_preset(type_key, presets).unwrap_or(&empty);

    let href = sanitize_url(url);
    let inline_style = style.to_inline_style();

    format!(
        r#"<a href="{}" style="{}">{}</a>"#,
        escape_html(&href),
        escape_html(&inline_style),
        escape_html(text)
    )
}
