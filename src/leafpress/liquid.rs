//! Brace template tags for GeoJSON popups.
//!
//! Popup text inside `[leaflet-geojson]` can reference feature properties
//! with a liquid-like syntax: `{telephone | format: intl | bold}`. Braces
//! are used instead of square brackets because brackets are shortcode
//! syntax and would be consumed before the template ever reaches the map.
//! A span without at least one `|` modifier is not a tag at all; plain
//! braces in prose pass through untouched.
//!
//! The substitution itself happens client side, per feature. The server only
//! needs the parsed form: the property expression and its modifiers, with
//! the first tag in the content standing in for the default popup property.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static TEMPLATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{ *(.*?) *\}").unwrap());

/// A modifier is either a flag (`| bold`) or carries a value
/// (`| format: intl`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifierValue {
    Text(String),
    Flag,
}

/// The first brace template found in a piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidTag {
    /// The property expression, before any `|`.
    pub original: String,
    /// Modifiers by name. A repeated name keeps the last occurrence.
    pub modifiers: BTreeMap<String, ModifierValue>,
}

impl LiquidTag {
    pub fn modifier(&self, name: &str) -> Option<&ModifierValue> {
        self.modifiers.get(name)
    }

    /// The value of a text modifier, if present with a value.
    pub fn text_modifier(&self, name: &str) -> Option<&str> {
        match self.modifiers.get(name) {
            Some(ModifierValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn has_flag(&self, name: &str) -> bool {
        matches!(self.modifiers.get(name), Some(ModifierValue::Flag))
    }
}

/// Parse the first `{...}` tag out of `text`. Returns `None` when there is
/// no brace span, when it is empty, and when no modifiers follow the
/// property. The last case means `{name}` on its own is plain text.
///
/// Segments are separated by `" | "` and modifier values by `": "`, both
/// with mandatory spaces; a segment without `": "` is a flag. The value runs
/// to the end of its segment, so colons inside values survive.
pub fn parse(text: &str) -> Option<LiquidTag> {
    let caps = TEMPLATE_RE.captures(text)?;
    let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");

    let mut parts = inner.split(" | ");
    let original = match parts.next() {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => return None,
    };

    let mut modifiers = BTreeMap::new();
    for part in parts {
        if part.is_empty() {
            continue;
        }
        match part.split_once(": ") {
            Some((name, value)) if !value.is_empty() => {
                modifiers.insert(name.to_string(), ModifierValue::Text(value.to_string()));
            }
            Some((name, _)) => {
                modifiers.insert(name.to_string(), ModifierValue::Flag);
            }
            None => {
                modifiers.insert(part.to_string(), ModifierValue::Flag);
            }
        }
    }

    if modifiers.is_empty() {
        return None;
    }

    Some(LiquidTag { original, modifiers })
}
