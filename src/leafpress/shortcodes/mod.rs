//! # Shortcode Registry
//!
//! This module defines the [`Shortcode`] trait and the registry mapping tag
//! names to handlers. The registry is plain owned state handed to the
//! expansion pipeline, so two plugins (or two tests) never share handlers
//! through a global table.
//!
//! ## Registration Rules
//!
//! - First registration of a tag wins; a second attempt is an error, never a
//!   silent replacement
//! - [`ShortcodeRegistry::register_builtins`] tolerates per-tag failures and
//!   reports them as warnings, so one bad registration cannot empty the map
//!   support of a whole site
//!
//! ## Built-in Tags
//!
//! Map tags are unprefixed (`leaflet-map`, `leaflet-marker`, ...) to stay
//! compatible with content written for their established names. General
//! tags carry the option prefix (`wppt_powered_by`).
//!
//! ## Generated Script Shape
//!
//! Every handler emits a `<script>` block that pushes a function onto
//! `window.WPLeafletMapPlugin`. Until the bootstrap in
//! [`assets`](crate::assets) runs, that object is a plain array, so the
//! blocks are order-preserving and safe to emit before Leaflet loads. Shapes
//! attach to the most recently created map via `getCurrentMap()`.

use crate::error::{LeafpressError, Result};
use crate::render::{RenderContext, RenderMessage};
use crate::settings::store::OPTION_PREFIX;
use crate::style::{parse_bool, parse_float};
use shortscan::Attrs;

pub mod map;
pub mod marker;
pub mod overlays;
pub mod powered_by;
pub mod scale;
pub mod shapes;

/// A shortcode handler. `content` is the enclosed text for
/// `[tag]...[/tag]` forms and `None` for self-closing ones.
pub trait Shortcode {
    fn render(
        &self,
        ctx: &mut RenderContext,
        attrs: &Attrs,
        content: Option<&str>,
    ) -> Result<String>;
}

/// Whether a tag is part of the map family or a general content tag. The
/// distinction matters to hosts that only enable map tags in some places
/// (excerpts, feeds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcodeKind {
    Standard,
    Leaflet,
}

pub struct ShortcodeEntry {
    tag: String,
    kind: ShortcodeKind,
    handler: Box<dyn Shortcode>,
}

impl ShortcodeEntry {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn kind(&self) -> ShortcodeKind {
        self.kind
    }

    pub fn render(
        &self,
        ctx: &mut RenderContext,
        attrs: &Attrs,
        content: Option<&str>,
    ) -> Result<String> {
        self.handler.render(ctx, attrs, content)
    }
}

/// Tag-to-handler table, checked in document order. The set is small enough
/// that a linear scan beats hashing.
#[derive(Default)]
pub struct ShortcodeRegistry {
    entries: Vec<ShortcodeEntry>,
}

impl ShortcodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a tag. Registering a tag twice is an error and
    /// leaves the first handler in place.
    pub fn register(
        &mut self,
        tag: &str,
        kind: ShortcodeKind,
        handler: Box<dyn Shortcode>,
    ) -> Result<()> {
        if self.contains(tag) {
            return Err(LeafpressError::DuplicateShortcode(tag.to_string()));
        }
        self.entries.push(ShortcodeEntry {
            tag: tag.to_string(),
            kind,
            handler,
        });
        Ok(())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn get(&self, tag: &str) -> Option<&ShortcodeEntry> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    /// Registered tag names in registration order.
    pub fn tags(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.tag.as_str()).collect()
    }

    /// Register the full built-in set. A tag that fails to register is
    /// reported and skipped; the others still work.
    pub fn register_builtins(&mut self) -> Vec<RenderMessage> {
        let powered_by_tag = format!("{}powered_by", OPTION_PREFIX);
        let builtins: Vec<(String, ShortcodeKind, Box<dyn Shortcode>)> = vec![
            (
                powered_by_tag,
                ShortcodeKind::Standard,
                Box::new(powered_by::PoweredBy),
            ),
            (
                "leaflet-map".to_string(),
                ShortcodeKind::Leaflet,
                Box::new(map::Map),
            ),
            (
                "leaflet-marker".to_string(),
                ShortcodeKind::Leaflet,
                Box::new(marker::Marker),
            ),
            (
                "leaflet-line".to_string(),
                ShortcodeKind::Leaflet,
                Box::new(shapes::Line),
            ),
            (
                "leaflet-polygon".to_string(),
                ShortcodeKind::Leaflet,
                Box::new(shapes::Polygon),
            ),
            (
                "leaflet-circle".to_string(),
                ShortcodeKind::Leaflet,
                Box::new(shapes::Circle),
            ),
            (
                "leaflet-geojson".to_string(),
                ShortcodeKind::Leaflet,
                Box::new(overlays::Geojson),
            ),
            (
                "leaflet-image".to_string(),
                ShortcodeKind::Leaflet,
                Box::new(overlays::ImageOverlay),
            ),
            (
                "leaflet-kml".to_string(),
                ShortcodeKind::Leaflet,
                Box::new(overlays::ConvertedLayer { format: "kml" }),
            ),
            (
                "leaflet-gpx".to_string(),
                ShortcodeKind::Leaflet,
                Box::new(overlays::ConvertedLayer { format: "gpx" }),
            ),
            (
                "leaflet-scale".to_string(),
                ShortcodeKind::Leaflet,
                Box::new(scale::Scale),
            ),
        ];

        let mut messages = Vec::new();
        for (tag, kind, handler) in builtins {
            if let Err(error) = self.register(&tag, kind, handler) {
                messages.push(RenderMessage::warning(format!(
                    "shortcode [{}] not registered: {}",
                    tag, error
                )));
            }
        }
        messages
    }
}

/// Wrap a generated body in the queue-push script block shared by all map
/// tags.
pub fn script_block(body: &str) -> String {
    format!(
        "<script>\n\
         window.WPLeafletMapPlugin = window.WPLeafletMapPlugin || [];\n\
         window.WPLeafletMapPlugin.push(function () {{\n\
         {}\n\
         }});\n\
         </script>\n",
        body
    )
}

/// A JS object literal whose values are emitted verbatim, for options that
/// mix numbers, booleans and already-quoted strings.
pub fn raw_dict(pairs: &[(&str, String)]) -> String {
    let mut out = String::from("{");
    for (key, value) in pairs {
        out.push_str(&format!("\"{}\": {},", key, value));
    }
    out.push('}');
    out
}

/// A single-quoted JS string literal. `<` becomes a unicode escape so a
/// value can never carry `</script>` into the surrounding script block.
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\u003C"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Numeric attribute with a warning on malformed input. Returns `None` both
/// when absent and when dropped, so callers fall back to settings either way.
pub fn number_attr(ctx: &mut RenderContext, attrs: &Attrs, name: &str) -> Option<f64> {
    let value = attrs.get_ci(name)?;
    match parse_float(value) {
        Some(parsed) => Some(parsed),
        None => {
            ctx.warn(format!(
                "attribute {} ignored: {:?} is not a number",
                name, value
            ));
            None
        }
    }
}

/// Numeric value resolved attribute-first, then from a stored setting. A
/// junk setting value warns and resolves to zero rather than reaching the
/// page.
pub fn number_or_setting(
    ctx: &mut RenderContext,
    attrs: &Attrs,
    attr: &str,
    setting: &str,
) -> Result<f64> {
    if let Some(value) = number_attr(ctx, attrs, attr) {
        return Ok(value);
    }
    let text = ctx.settings().text(setting)?;
    match parse_float(&text) {
        Some(value) => Ok(value),
        None => {
            ctx.warn(format!("setting {} is not a number: {:?}", setting, text));
            Ok(0.0)
        }
    }
}

/// Boolean attribute with a warning on malformed input.
pub fn bool_attr(ctx: &mut RenderContext, attrs: &Attrs, name: &str) -> Option<bool> {
    let value = attrs.get_ci(name)?;
    match parse_bool(value) {
        Some(parsed) => Some(parsed),
        None => {
            ctx.warn(format!(
                "attribute {} ignored: {:?} is not a boolean",
                name, value
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::defaults::SettingDefaults;
    use crate::settings::store::MemoryOptions;
    use crate::settings::Resolved;

    struct Fixed(&'static str);

    impl Shortcode for Fixed {
        fn render(
            &self,
            _ctx: &mut RenderContext,
            _attrs: &Attrs,
            _content: Option<&str>,
        ) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = ShortcodeRegistry::new();
        registry
            .register("x", ShortcodeKind::Standard, Box::new(Fixed("first")))
            .unwrap();

        let err = registry
            .register("x", ShortcodeKind::Standard, Box::new(Fixed("second")))
            .unwrap_err();
        assert!(matches!(err, LeafpressError::DuplicateShortcode(_)));

        let store = MemoryOptions::new();
        let defaults = SettingDefaults::new();
        let mut ctx = RenderContext::new(Resolved::new(&store, &defaults), &registry);
        let entry = registry.get("x").unwrap();
        let html = entry.render(&mut ctx, &Attrs::new(), None).unwrap();
        assert_eq!(html, "first");
    }

    #[test]
    fn builtins_cover_the_documented_tags() {
        let mut registry = ShortcodeRegistry::new();
        let messages = registry.register_builtins();
        assert!(messages.is_empty());
        assert_eq!(
            registry.tags(),
            vec![
                "wppt_powered_by",
                "leaflet-map",
                "leaflet-marker",
                "leaflet-line",
                "leaflet-polygon",
                "leaflet-circle",
                "leaflet-geojson",
                "leaflet-image",
                "leaflet-kml",
                "leaflet-gpx",
                "leaflet-scale",
            ]
        );
    }

    #[test]
    fn repeated_builtin_registration_degrades_to_warnings() {
        let mut registry = ShortcodeRegistry::new();
        registry.register_builtins();
        let messages = registry.register_builtins();
        assert_eq!(messages.len(), 11);
        assert_eq!(registry.tags().len(), 11);
    }

    #[test]
    fn kind_distinguishes_map_tags() {
        let mut registry = ShortcodeRegistry::new();
        registry.register_builtins();
        assert_eq!(
            registry.get("wppt_powered_by").unwrap().kind(),
            ShortcodeKind::Standard
        );
        assert_eq!(
            registry.get("leaflet-map").unwrap().kind(),
            ShortcodeKind::Leaflet
        );
    }

    #[test]
    fn script_block_wraps_the_body() {
        let block = script_block("var x = 1;");
        assert!(block.starts_with("<script>\n"));
        assert!(block.contains("window.WPLeafletMapPlugin = window.WPLeafletMapPlugin || [];"));
        assert!(block.contains("window.WPLeafletMapPlugin.push(function () {\nvar x = 1;\n});"));
        assert!(block.ends_with("</script>\n"));
    }

    #[test]
    fn raw_dict_emits_values_verbatim() {
        let dict = raw_dict(&[
            ("zoomControl", "true".to_string()),
            ("minZoom", "0".to_string()),
            ("attribution", "'OSM'".to_string()),
        ]);
        assert_eq!(
            dict,
            r#"{"zoomControl": true,"minZoom": 0,"attribution": 'OSM',}"#
        );
    }

    #[test]
    fn empty_raw_dict_is_an_empty_object() {
        assert_eq!(raw_dict(&[]), "{}");
    }

    #[test]
    fn js_string_escapes_quotes_and_newlines() {
        assert_eq!(js_string("plain"), "'plain'");
        assert_eq!(js_string("it's"), r"'it\'s'");
        assert_eq!(js_string("a\nb"), r"'a\nb'");
        assert_eq!(js_string(r"back\slash"), r"'back\\slash'");
    }

    #[test]
    fn js_string_cannot_terminate_a_script_block() {
        assert_eq!(js_string("<b>"), "'\\u003Cb>'");
        let quoted = js_string("a</script><script>alert(1)</script>b");
        assert!(!quoted.contains('<'));
        assert_eq!(
            quoted,
            "'a\\u003C/script>\\u003Cscript>alert(1)\\u003C/script>b'"
        );
    }
}
