use crate::error::Result;
use crate::render::RenderContext;
use crate::shortcodes::{
    bool_attr, js_string, number_attr, number_or_setting, raw_dict, script_block, Shortcode,
};
use crate::style::{parse_float, sanitize_string};
use shortscan::Attrs;

/// `[leaflet-map]`: the container div plus the `L.map` / `L.tileLayer`
/// bootstrap. Every option resolves attribute-first, then stored setting,
/// then static default; a malformed attribute warns and falls back instead
/// of leaking junk into the page.
pub struct Map;

impl Shortcode for Map {
    fn render(
        &self,
        ctx: &mut RenderContext,
        attrs: &Attrs,
        _content: Option<&str>,
    ) -> Result<String> {
        let map_id = ctx.next_map_id();

        let lat = number_or_setting(ctx, attrs, "lat", "default_lat")?;
        let lng = number_or_setting(ctx, attrs, "lng", "default_lng")?;
        let zoom = number_or_setting(ctx, attrs, "zoom", "default_zoom")?;
        let min_zoom = number_or_setting(ctx, attrs, "min_zoom", "default_min_zoom")?;
        let max_zoom = number_or_setting(ctx, attrs, "max_zoom", "default_max_zoom")?;

        let zoom_control = resolve_flag(ctx, attrs, "zoomcontrol", "show_zoom_controls")?;
        let scroll_wheel = resolve_flag(ctx, attrs, "scrollwheel", "scroll_wheel_zoom")?;
        let double_click = resolve_flag(ctx, attrs, "doubleclickzoom", "double_click_zoom")?;
        let fit_bounds = resolve_flag(ctx, attrs, "fitbounds", "fit_markers")?;
        let detect_retina = resolve_flag(ctx, attrs, "detect-retina", "detect_retina")?;
        let no_wrap = resolve_flag(ctx, attrs, "nowrap", "tile_no_wrap")?;

        let height =
            resolve_dimension(attrs.get_ci("height"), ctx.settings().text("default_height")?);
        let width =
            resolve_dimension(attrs.get_ci("width"), ctx.settings().text("default_width")?);

        let tile_url = resolve_text(attrs.get_ci("tileurl"), ctx.settings().text("map_tile_url")?);
        let subdomains = resolve_text(
            attrs.get_ci("subdomains"),
            ctx.settings().text("map_tile_url_subdomains")?,
        );
        let attribution = resolve_text(
            attrs.get_ci("attribution"),
            ctx.settings().text("default_attribution")?,
        );

        let tile_size = resolve_number_opt(ctx, attrs, "tilesize", "tilesize")?;
        let zoom_offset = resolve_number_opt(ctx, attrs, "zoomoffset", "zoomoffset")?;
        let tile_id = resolve_text_opt(attrs.get_ci("mapid"), ctx.settings().text("mapid")?);
        let access_token =
            resolve_text_opt(attrs.get_ci("accesstoken"), ctx.settings().text("accesstoken")?);

        let show_scale = ctx.settings().flag("show_scale")?;

        let map_options = raw_dict(&[
            ("zoomControl", zoom_control.to_string()),
            ("scrollWheelZoom", scroll_wheel.to_string()),
            ("doubleClickZoom", double_click.to_string()),
            ("minZoom", min_zoom.to_string()),
            ("maxZoom", max_zoom.to_string()),
            ("fitBounds", fit_bounds.to_string()),
        ]);

        let mut tile_options: Vec<(&str, String)> = vec![
            ("subdomains", js_string(&subdomains)),
            ("detectRetina", detect_retina.to_string()),
            ("noWrap", no_wrap.to_string()),
        ];
        if let Some(size) = tile_size {
            tile_options.push(("tileSize", size.to_string()));
        }
        if let Some(id) = &tile_id {
            tile_options.push(("id", js_string(id)));
        }
        if let Some(token) = &access_token {
            tile_options.push(("accessToken", js_string(token)));
        }
        if let Some(offset) = zoom_offset {
            tile_options.push(("zoomOffset", offset.to_string()));
        }
        tile_options.push(("attribution", js_string(&attribution)));

        let scale_line = if show_scale {
            "L.control.scale().addTo(map);\n"
        } else {
            ""
        };

        let body = format!(
            "var map = L.map('leaflet-map-{}', {});\n\
             map.setView([{}, {}], {});\n\
             L.tileLayer({}, {}).addTo(map);\n\
             {}window.WPLeafletMapPlugin.maps.push(map);",
            map_id,
            map_options,
            lat,
            lng,
            zoom,
            js_string(&tile_url),
            raw_dict(&tile_options),
            scale_line
        );

        let div = format!(
            "<div id=\"leaflet-map-{}\" class=\"leaflet-map\" style=\"height:{}; width:{};\"></div>\n",
            map_id, height, width
        );

        Ok(format!("{}{}", div, script_block(&body)))
    }
}

fn resolve_number_opt(
    ctx: &mut RenderContext,
    attrs: &Attrs,
    attr: &str,
    setting: &str,
) -> Result<Option<f64>> {
    if let Some(value) = number_attr(ctx, attrs, attr) {
        return Ok(Some(value));
    }
    let text = ctx.settings().text(setting)?;
    if text.is_empty() {
        return Ok(None);
    }
    match parse_float(&text) {
        Some(value) => Ok(Some(value)),
        None => {
            ctx.warn(format!("setting {} is not a number: {:?}", setting, text));
            Ok(None)
        }
    }
}

fn resolve_flag(
    ctx: &mut RenderContext,
    attrs: &Attrs,
    attr: &str,
    setting: &str,
) -> Result<bool> {
    match bool_attr(ctx, attrs, attr) {
        Some(value) => Ok(value),
        None => ctx.settings().flag(setting),
    }
}

fn resolve_text(attr: Option<&str>, setting: String) -> String {
    match attr {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => setting,
    }
}

fn resolve_text_opt(attr: Option<&str>, setting: String) -> Option<String> {
    let value = resolve_text(attr, setting);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn resolve_dimension(attr: Option<&str>, setting: String) -> String {
    let value = match attr {
        Some(value) if !value.is_empty() => sanitize_string(value),
        _ => setting,
    };
    css_dimension(&value)
}

/// Bare numbers get a `px` suffix; anything with a unit passes through.
fn css_dimension(value: &str) -> String {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}px", value)
    } else {
        value.to_string()
    }
}
