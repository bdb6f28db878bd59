use crate::error::Result;
use crate::render::RenderContext;
use crate::shortcodes::{bool_attr, js_string, number_attr, raw_dict, script_block, Shortcode};
use crate::style::sanitize_string;
use shortscan::Attrs;

/// `[leaflet-scale]`: a scale control on the current map. Only attributes
/// the author supplies are emitted; everything else is left to Leaflet's
/// own defaults.
pub struct Scale;

impl Shortcode for Scale {
    fn render(
        &self,
        ctx: &mut RenderContext,
        attrs: &Attrs,
        _content: Option<&str>,
    ) -> Result<String> {
        let mut options: Vec<(&str, String)> = Vec::new();
        if let Some(position) = attrs.get_ci("position") {
            options.push(("position", js_string(&sanitize_string(position))));
        }
        if let Some(width) = number_attr(ctx, attrs, "maxwidth") {
            options.push(("maxWidth", width.to_string()));
        }
        if let Some(metric) = bool_attr(ctx, attrs, "metric") {
            options.push(("metric", metric.to_string()));
        }
        if let Some(imperial) = bool_attr(ctx, attrs, "imperial") {
            options.push(("imperial", imperial.to_string()));
        }
        if let Some(idle) = bool_attr(ctx, attrs, "updatewhenidle") {
            options.push(("updateWhenIdle", idle.to_string()));
        }

        let body = format!(
            "var scale = L.control.scale({});\n\
             scale.addTo(window.WPLeafletMapPlugin.getCurrentMap());",
            raw_dict(&options)
        );

        Ok(script_block(&body))
    }
}
