use crate::error::Result;
use crate::popup::popup_statement;
use crate::render::RenderContext;
use crate::shortcodes::{bool_attr, number_or_setting, raw_dict, script_block, Shortcode};
use shortscan::Attrs;

/// `[leaflet-marker]`: a pin on the most recent map, optionally draggable,
/// with a popup from the `message` attribute or the enclosed content.
pub struct Marker;

impl Shortcode for Marker {
    fn render(
        &self,
        ctx: &mut RenderContext,
        attrs: &Attrs,
        content: Option<&str>,
    ) -> Result<String> {
        let lat = number_or_setting(ctx, attrs, "lat", "default_lat")?;
        let lng = number_or_setting(ctx, attrs, "lng", "default_lng")?;
        let draggable = bool_attr(ctx, attrs, "draggable").unwrap_or(false);

        let options = raw_dict(&[("draggable", draggable.to_string())]);

        let mut body = format!(
            "var marker = L.marker([{}, {}], {});\n\
             marker.addTo(window.WPLeafletMapPlugin.getCurrentMap());",
            lat, lng, options
        );
        if let Some(statement) = popup_statement(attrs, content, "marker") {
            body.push('\n');
            body.push_str(&statement);
        }
        body.push_str("\nwindow.WPLeafletMapPlugin.markers.push(marker);");

        Ok(script_block(&body))
    }
}
