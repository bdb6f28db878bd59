use crate::error::Result;
use crate::popup::popup_statement;
use crate::render::RenderContext;
use crate::shortcodes::{number_or_setting, script_block, Shortcode};
use crate::style::{parse_float, Style};
use shortscan::Attrs;

/// `[leaflet-line latlngs="lat,lng;lat,lng;..."]`
pub struct Line;

impl Shortcode for Line {
    fn render(
        &self,
        ctx: &mut RenderContext,
        attrs: &Attrs,
        content: Option<&str>,
    ) -> Result<String> {
        render_path(ctx, attrs, content, "line", "polyline")
    }
}

/// `[leaflet-polygon latlngs="..."]`, same wire shape as a line but closed.
pub struct Polygon;

impl Shortcode for Polygon {
    fn render(
        &self,
        ctx: &mut RenderContext,
        attrs: &Attrs,
        content: Option<&str>,
    ) -> Result<String> {
        render_path(ctx, attrs, content, "polygon", "polygon")
    }
}

/// `[leaflet-circle lat=... lng=... radius=...]`. The radius travels inside
/// the style options, as Leaflet expects.
pub struct Circle;

impl Shortcode for Circle {
    fn render(
        &self,
        ctx: &mut RenderContext,
        attrs: &Attrs,
        content: Option<&str>,
    ) -> Result<String> {
        let lat = number_or_setting(ctx, attrs, "lat", "default_lat")?;
        let lng = number_or_setting(ctx, attrs, "lng", "default_lng")?;

        let (style, warnings) = Style::from_attrs(attrs);
        ctx.push_messages(warnings);
        let options = style.to_json()?;

        let mut body = format!(
            "var circle = L.circle([{}, {}], {});\n\
             circle.addTo(window.WPLeafletMapPlugin.getCurrentMap());",
            lat, lng, options
        );
        if let Some(statement) = popup_statement(attrs, content, "circle") {
            body.push('\n');
            body.push_str(&statement);
        }

        Ok(script_block(&body))
    }
}

fn render_path(
    ctx: &mut RenderContext,
    attrs: &Attrs,
    content: Option<&str>,
    var: &str,
    ctor: &str,
) -> Result<String> {
    let pairs = parse_latlngs(ctx, attrs.get_ci("latlngs").unwrap_or(""));
    let (style, warnings) = Style::from_attrs(attrs);
    ctx.push_messages(warnings);
    let options = style.to_json()?;

    let mut body = format!(
        "var {} = L.{}({}, {});\n\
         {}.addTo(window.WPLeafletMapPlugin.getCurrentMap());",
        var,
        ctor,
        latlngs_js(&pairs),
        options,
        var
    );
    if let Some(statement) = popup_statement(attrs, content, var) {
        body.push('\n');
        body.push_str(&statement);
    }

    Ok(script_block(&body))
}

/// Semicolon-separated `lat,lng` pairs. A pair that does not parse is
/// skipped with a warning; the rest of the shape still renders.
fn parse_latlngs(ctx: &mut RenderContext, text: &str) -> Vec<(f64, f64)> {
    let mut pairs = Vec::new();
    for chunk in text.split(';') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        let mut parts = chunk.splitn(2, ',');
        let lat = parts.next().and_then(parse_float);
        let lng = parts.next().and_then(parse_float);
        match (lat, lng) {
            (Some(lat), Some(lng)) => pairs.push((lat, lng)),
            _ => ctx.warn(format!("latlngs pair {:?} skipped: not a lat,lng", chunk)),
        }
    }
    pairs
}

fn latlngs_js(pairs: &[(f64, f64)]) -> String {
    let rendered: Vec<String> = pairs
        .iter()
        .map(|(lat, lng)| format!("[{}, {}]", lat, lng))
        .collect();
    format!("[{}]", rendered.join(","))
}

#[cfg(test)]
mod tests {
    use crate::render::{expand, RenderOutput};
    use crate::settings::defaults::SettingDefaults;
    use crate::settings::store::MemoryOptions;
    use crate::settings::Resolved;
    use crate::shortcodes::ShortcodeRegistry;

    fn run(content: &str) -> RenderOutput {
        let store = MemoryOptions::new();
        let defaults = SettingDefaults::new();
        let mut registry = ShortcodeRegistry::new();
        registry.register_builtins();
        expand(content, &registry, Resolved::new(&store, &defaults))
    }

    #[test]
    fn line_renders_a_polyline() {
        let html = run(r#"[leaflet-line latlngs="44.67,-63.61;44.68,-63.59" color=red]"#).html;
        assert!(html.contains(
            "var line = L.polyline([[44.67, -63.61],[44.68, -63.59]], {\"color\":\"red\"});"
        ));
        assert!(html.contains("line.addTo(window.WPLeafletMapPlugin.getCurrentMap());"));
    }

    #[test]
    fn polygon_uses_its_own_constructor() {
        let html = run(r#"[leaflet-polygon latlngs="0,0;0,1;1,1"]"#).html;
        assert!(html.contains("var polygon = L.polygon([[0, 0],[0, 1],[1, 1]], {});"));
    }

    #[test]
    fn malformed_pairs_are_skipped_with_a_warning() {
        let output = run(r#"[leaflet-line latlngs="junk;44.5,-63.5"]"#);
        assert!(output.html.contains("L.polyline([[44.5, -63.5]], {});"));
        assert_eq!(output.messages.len(), 1);
        assert!(output.messages[0].text.contains("junk"));
    }

    #[test]
    fn missing_latlngs_still_renders_an_empty_path() {
        let output = run("[leaflet-line]");
        assert!(output.html.contains("L.polyline([], {});"));
        assert!(output.messages.is_empty());
    }

    #[test]
    fn circle_takes_radius_through_style() {
        let html =
            run(r##"[leaflet-circle lat=44.5 lng=-63.5 radius=500 fillcolor="#b1de23"]"##).html;
        assert!(html.contains("var circle = L.circle([44.5, -63.5], "));
        assert!(html.contains("\"radius\":500.0"));
        assert!(html.contains("\"fillColor\":\"#b1de23\""));
    }

    #[test]
    fn mixed_case_attribute_names_still_style_the_shape() {
        let html = run(r#"[leaflet-circle lat=1 lng=2 FillColor="red" Weight=3]"#).html;
        assert!(html.contains("\"fillColor\":\"red\""));
        assert!(html.contains("\"weight\":3.0"));
    }

    #[test]
    fn circle_defaults_to_the_map_center() {
        let html = run("[leaflet-circle]").html;
        assert!(html.contains("L.circle([44.67, -63.61], {});"));
    }

    #[test]
    fn shapes_take_popups() {
        let html = run(r#"[leaflet-line latlngs="1,2"]the path[/leaflet-line]"#).html;
        assert!(html.contains("line.bindPopup(window.WPLeafletMapPlugin.unescape('the path'));"));
    }

    #[test]
    fn bad_style_attribute_warns_but_shape_survives() {
        let output = run(r#"[leaflet-polygon latlngs="0,0;1,1" weight=heavy]"#);
        assert!(output.html.contains("L.polygon("));
        assert!(!output.html.contains("weight"));
        assert_eq!(output.messages.len(), 1);
    }
}
