//! Shape styling from shortcode attributes.
//!
//! Shapes accept the Leaflet path options (`color`, `weight`, `fillOpacity`
//! and friends) as flat shortcode attributes. [`Style::from_attrs`] collects
//! and validates them into a typed struct whose JSON form is handed straight
//! to `L.polyline` / `L.polygon` / `L.circle`.
//!
//! Validation is strict where it matters: a boolean or numeric attribute that
//! does not parse is dropped with a warning rather than coerced, so a typo in
//! `fill="ture"` can never switch a shape's fill off. String attributes are
//! sanitized (tags stripped, quotes encoded) since they end up inside a
//! generated script block.

use crate::error::{LeafpressError, Result};
use crate::render::RenderMessage;
use serde::Serialize;
use shortscan::Attrs;

/// Leaflet path options, all optional. Absent fields stay out of the JSON so
/// Leaflet's own defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_cap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_join: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_offset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl Style {
    /// Collect style attributes. Attribute names are matched
    /// case-insensitively in their flattened form (`fillcolor`,
    /// `dasharray`). Invalid boolean and numeric values produce a warning
    /// and leave the field unset.
    pub fn from_attrs(attrs: &Attrs) -> (Self, Vec<RenderMessage>) {
        let mut messages = Vec::new();

        let style = Self {
            stroke: bool_attr(attrs, "stroke", &mut messages),
            color: text_attr(attrs, "color"),
            weight: float_attr(attrs, "weight", &mut messages),
            opacity: float_attr(attrs, "opacity", &mut messages),
            line_cap: text_attr(attrs, "linecap"),
            line_join: text_attr(attrs, "linejoin"),
            dash_array: text_attr(attrs, "dasharray"),
            dash_offset: text_attr(attrs, "dashoffset"),
            fill: bool_attr(attrs, "fill", &mut messages),
            fill_color: text_attr(attrs, "fillcolor"),
            fill_opacity: float_attr(attrs, "fillopacity", &mut messages),
            fill_rule: text_attr(attrs, "fillrule"),
            class_name: text_attr(attrs, "classname"),
            radius: float_attr(attrs, "radius", &mut messages),
        };

        (style, messages)
    }

    /// JSON object for the generated script. All fields unset gives `{}`.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(LeafpressError::Serialization)
    }
}

fn lookup<'a>(attrs: &'a Attrs, name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

fn bool_attr(attrs: &Attrs, name: &str, messages: &mut Vec<RenderMessage>) -> Option<bool> {
    let value = lookup(attrs, name)?;
    match parse_bool(value) {
        Some(parsed) => Some(parsed),
        None => {
            messages.push(RenderMessage::warning(format!(
                "style attribute {} ignored: {:?} is not a boolean",
                name, value
            )));
            None
        }
    }
}

fn float_attr(attrs: &Attrs, name: &str, messages: &mut Vec<RenderMessage>) -> Option<f64> {
    let value = lookup(attrs, name)?;
    match parse_float(value) {
        Some(parsed) => Some(parsed),
        None => {
            messages.push(RenderMessage::warning(format!(
                "style attribute {} ignored: {:?} is not a number",
                name, value
            )));
            None
        }
    }
}

fn text_attr(attrs: &Attrs, name: &str) -> Option<String> {
    lookup(attrs, name).map(sanitize_string)
}

/// Lenient boolean parsing shared by style attributes, popup visibility, and
/// checkbox settings. `None` means the input is not recognizably boolean.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Finite floats only; `inf` and `NaN` have no JSON form.
pub fn parse_float(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

/// Strip `<...>` tag spans (an unclosed `<` drops the rest of the string)
/// and encode quotes, so the value is inert inside generated markup.
pub fn sanitize_string(input: &str) -> String {
    let mut stripped = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        stripped.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => rest = "",
        }
    }
    stripped.push_str(rest);

    let mut encoded = String::with_capacity(stripped.len());
    for ch in stripped.chars() {
        match ch {
            '"' => encoded.push_str("&#34;"),
            '\'' => encoded.push_str("&#39;"),
            _ => encoded.push(ch),
        }
    }
    encoded
}
