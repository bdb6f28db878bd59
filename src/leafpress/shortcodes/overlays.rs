use crate::error::{LeafpressError, Result};
use crate::liquid;
use crate::popup::popup_statement;
use crate::render::RenderContext;
use crate::shortcodes::{js_string, script_block, Shortcode};
use crate::style::Style;
use shortscan::Attrs;

/// `[leaflet-geojson src="..."]`: a fetched GeoJSON layer. Popup text comes
/// from the enclosed content and is templated per feature on the client;
/// the default popup property can be given as `popup_property` or derived
/// from the first brace template in the content.
pub struct Geojson;

impl Shortcode for Geojson {
    fn render(
        &self,
        ctx: &mut RenderContext,
        attrs: &Attrs,
        content: Option<&str>,
    ) -> Result<String> {
        render_loader(ctx, attrs, content, "geojson", "getGeoJson")
    }
}

/// `[leaflet-kml]` / `[leaflet-gpx]`: like geojson, but the source document
/// goes through the togeojson converter first, so rendering one flags the
/// converter script for the page head.
pub struct ConvertedLayer {
    pub format: &'static str,
}

impl Shortcode for ConvertedLayer {
    fn render(
        &self,
        ctx: &mut RenderContext,
        attrs: &Attrs,
        content: Option<&str>,
    ) -> Result<String> {
        let method = if self.format == "gpx" {
            "getGpx"
        } else {
            "getKml"
        };
        let rendered = render_loader(ctx, attrs, content, self.format, method)?;
        ctx.mark_togeojson();
        Ok(rendered)
    }
}

/// `[leaflet-image src="..."]`: an image overlay scaled onto the current
/// map.
pub struct ImageOverlay;

impl Shortcode for ImageOverlay {
    fn render(
        &self,
        _ctx: &mut RenderContext,
        attrs: &Attrs,
        content: Option<&str>,
    ) -> Result<String> {
        let src = required_src(attrs)?;

        let mut body = format!(
            "var image = window.WPLeafletMapPlugin.getImageOverlay({});\n\
             image.addTo(window.WPLeafletMapPlugin.getCurrentMap());",
            js_string(src)
        );
        if let Some(statement) = popup_statement(attrs, content, "image") {
            body.push('\n');
            body.push_str(&statement);
        }

        Ok(script_block(&body))
    }
}

fn required_src(attrs: &Attrs) -> Result<&str> {
    attrs
        .get_ci("src")
        .filter(|src| !src.is_empty())
        .ok_or_else(|| LeafpressError::Render("needs a src attribute".to_string()))
}

fn render_loader(
    ctx: &mut RenderContext,
    attrs: &Attrs,
    content: Option<&str>,
    var: &str,
    method: &str,
) -> Result<String> {
    let src = required_src(attrs)?;

    let (style, warnings) = Style::from_attrs(attrs);
    ctx.push_messages(warnings);
    let options = style.to_json()?;

    let popup_property = match attrs.get_ci("popup_property") {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => content
            .and_then(liquid::parse)
            .map(|tag| tag.original)
            .unwrap_or_default(),
    };
    let popup_text = content.unwrap_or("");

    let body = format!(
        "var {} = window.WPLeafletMapPlugin.{}({}, {}, {}, {});\n\
         {}.addTo(window.WPLeafletMapPlugin.getCurrentMap());",
        var,
        method,
        js_string(src),
        options,
        js_string(&popup_property),
        js_string(popup_text),
        var
    );

    Ok(script_block(&body))
}
