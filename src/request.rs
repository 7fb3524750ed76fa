//! Render request model
//!
//! The inbound JSON object is validated once here; everything downstream
//! works with a fully defaulted [`RenderRequest`].

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{Error, Result};

/// Message returned when `code` is absent or empty
pub const CODE_REQUIRED: &str = "Code required";

/// Normalized render request with every optional field defaulted
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderRequest {
    pub code: String,
    pub language: String,
    pub theme: String,
    #[serde(deserialize_with = "css_length")]
    pub font_size: String,
    #[serde(deserialize_with = "css_length")]
    pub radius: String,
    #[serde(deserialize_with = "css_length")]
    pub padding: String,
    #[serde(deserialize_with = "css_length")]
    pub container_margin: String,
    #[serde(deserialize_with = "css_length")]
    pub gradient_padding: String,
    pub gradient_opacity: f64,
    pub shadow: bool,
    #[serde(deserialize_with = "shadow_intensity")]
    pub shadow_intensity: ShadowIntensity,
    pub show_line_numbers: bool,
    #[serde(deserialize_with = "line_number_style")]
    pub line_numbers_style: LineNumberStyle,
    pub show_window_controls: bool,
    pub show_tab: bool,
    pub file_name: String,
    pub title: String,
    pub watermark: String,
    pub background: BackgroundSelector,
    #[serde(deserialize_with = "css_angle")]
    pub gradient_angle: String,
    pub square_image: bool,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            code: String::new(),
            language: "javascript".to_string(),
            theme: crate::theme::DEFAULT_THEME.to_string(),
            font_size: "16px".to_string(),
            radius: "10px".to_string(),
            padding: "24px".to_string(),
            container_margin: "40px".to_string(),
            gradient_padding: "60px".to_string(),
            gradient_opacity: 1.0,
            shadow: true,
            shadow_intensity: ShadowIntensity::Light,
            show_line_numbers: true,
            line_numbers_style: LineNumberStyle::Minimal,
            show_window_controls: true,
            show_tab: true,
            file_name: String::new(),
            title: String::new(),
            watermark: "@akshat_arora7".to_string(),
            background: BackgroundSelector::default(),
            gradient_angle: "135deg".to_string(),
            square_image: true,
        }
    }
}

impl RenderRequest {
    /// Shorthand for a request carrying only `code`
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    /// Validate and normalize a raw JSON payload.
    ///
    /// `code` must be a non-empty string; any other field of the wrong JSON
    /// type is rejected rather than silently defaulted.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let object = payload
            .as_object()
            .ok_or_else(|| Error::InvalidRequest("Request body must be a JSON object".into()))?;

        match object.get("code") {
            Some(Value::String(code)) if !code.is_empty() => {}
            _ => return Err(Error::InvalidRequest(CODE_REQUIRED.into())),
        }

        RenderRequest::deserialize(payload).map_err(|e| Error::InvalidRequest(e.to_string()))
    }
}

/// Shadow preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowIntensity {
    #[default]
    Light,
    Medium,
    Heavy,
}

impl ShadowIntensity {
    /// Unknown names select [`ShadowIntensity::Light`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "medium" => ShadowIntensity::Medium,
            "heavy" => ShadowIntensity::Heavy,
            _ => ShadowIntensity::Light,
        }
    }

    /// CSS `box-shadow` value for the preset
    pub fn box_shadow(self) -> &'static str {
        match self {
            ShadowIntensity::Light => "rgba(0, 0, 0, 0.1) 0px 4px 12px",
            ShadowIntensity::Medium => "rgba(0, 0, 0, 0.15) 0px 5px 15px",
            ShadowIntensity::Heavy => "rgba(0, 0, 0, 0.25) 0px 8px 24px",
        }
    }
}

/// Line-number column styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineNumberStyle {
    /// Dimmed numbers with a hairline separator
    #[default]
    Minimal,
    /// Full-strength numbers, no separator
    Plain,
}

impl LineNumberStyle {
    /// Unknown names select [`LineNumberStyle::Minimal`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "plain" => LineNumberStyle::Plain,
            _ => LineNumberStyle::Minimal,
        }
    }
}

/// Client background selector: a single name/literal or a list of color stops
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BackgroundSelector {
    Named(String),
    Stops(Vec<String>),
}

impl Default for BackgroundSelector {
    fn default() -> Self {
        BackgroundSelector::Named("vivid".to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CssInput {
    Text(String),
    Number(f64),
}

fn css_value<'de, D>(deserializer: D, unit: &str) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CssInput::deserialize(deserializer)? {
        CssInput::Text(s) => s,
        CssInput::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}{}", n as i64, unit),
        CssInput::Number(n) => format!("{}{}", n, unit),
    })
}

fn css_length<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    css_value(deserializer, "px")
}

fn css_angle<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    css_value(deserializer, "deg")
}

fn shadow_intensity<'de, D>(deserializer: D) -> std::result::Result<ShadowIntensity, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| ShadowIntensity::from_name(&s))
}

fn line_number_style<'de, D>(deserializer: D) -> std::result::Result<LineNumberStyle, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| LineNumberStyle::from_name(&s))
}
