//! Front-end asset emission.
//!
//! Map scripts are emitted inline wherever a shortcode sits in the content,
//! so they can run before or after the Leaflet library loads. The bootstrap
//! handles both orders with a queue: until it runs, snippets push closures
//! onto a plain array; once it runs, the array is replayed and `push`
//! executes immediately.

use crate::error::Result;
use crate::settings::store::Resolved;

/// Inline script defining `window.WPLeafletMapPlugin`.
///
/// Every helper referenced by an emitted snippet lives here: the map and
/// marker arrays, `getCurrentMap`, popup `unescape`, and the layer loaders
/// for GeoJSON, KML, GPX and image overlays.
pub const PLUGIN_QUEUE_BOOTSTRAP: &str = r#"(function () {
    var queued = window.WPLeafletMapPlugin || [];
    var plugin = {
        maps: [],
        markers: [],
        push: function (fn) {
            fn();
        },
        getCurrentMap: function () {
            return plugin.maps[plugin.maps.length - 1];
        },
        unescape: function (text) {
            var box = document.createElement('textarea');
            box.innerHTML = text;
            return box.value.replace(/\\(.)/g, '$1');
        },
        template: function (text, props) {
            return text.replace(/\{ *(.*?) *\}/g, function (match, inner) {
                var key = inner.split(' | ')[0];
                var value = props ? props[key] : undefined;
                return value === undefined ? match : value;
            });
        },
        getLayer: function (src, style, popupProperty, popupText, convert) {
            var layer = L.geoJson(null, {
                style: style,
                onEachFeature: function (feature, featureLayer) {
                    var text = popupProperty
                        ? feature.properties && feature.properties[popupProperty]
                        : plugin.template(popupText, feature.properties);
                    if (text) {
                        featureLayer.bindPopup(text);
                    }
                }
            });
            var request = new XMLHttpRequest();
            request.open('GET', src);
            request.onload = function () {
                if (request.status === 200) {
                    layer.addData(convert(request.responseText));
                }
            };
            request.send();
            return layer;
        },
        getGeoJson: function (src, style, popupProperty, popupText) {
            return plugin.getLayer(src, style, popupProperty, popupText, function (data) {
                return JSON.parse(data);
            });
        },
        getKml: function (src, style, popupProperty, popupText) {
            return plugin.getLayer(src, style, popupProperty, popupText, function (data) {
                return toGeoJSON.kml(new DOMParser().parseFromString(data, 'text/xml'));
            });
        },
        getGpx: function (src, style, popupProperty, popupText) {
            return plugin.getLayer(src, style, popupProperty, popupText, function (data) {
                return toGeoJSON.gpx(new DOMParser().parseFromString(data, 'text/xml'));
            });
        },
        getImageOverlay: function (src) {
            var map = plugin.getCurrentMap();
            var overlay = L.imageOverlay(src, map.getBounds());
            var img = new Image();
            img.onload = function () {
                var southWest = map.containerPointToLatLng([0, img.height]);
                var northEast = map.containerPointToLatLng([img.width, 0]);
                overlay.setBounds(L.latLngBounds(southWest, northEast));
            };
            img.src = src;
            return overlay;
        }
    };
    window.WPLeafletMapPlugin = plugin;
    for (var i = 0; i < queued.length; i++) {
        queued[i]();
    }
})();
"#;

/// Render the `<head>` block for a page that contains maps: the Leaflet
/// stylesheet and script, the KML/GPX converter when a rendered page needs
/// it, and the plugin bootstrap.
pub fn head_assets(settings: &Resolved<'_>, needs_togeojson: bool) -> Result<String> {
    let css_url = settings.text("css_url")?;
    let js_url = settings.text("js_url")?;

    let mut html = String::new();
    html.push_str(&format!(
        "<link rel=\"stylesheet\" href=\"{}\" />\n",
        escape_url(&css_url)
    ));
    html.push_str(&format!(
        "<script src=\"{}\"></script>\n",
        escape_url(&js_url)
    ));
    if needs_togeojson {
        let togeojson_url = settings.text("togeojson_url")?;
        html.push_str(&format!(
            "<script src=\"{}\"></script>\n",
            escape_url(&togeojson_url)
        ));
    }
    html.push_str("<script>\n");
    html.push_str(PLUGIN_QUEUE_BOOTSTRAP);
    html.push_str("</script>\n");
    Ok(html)
}

fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for ch in url.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::defaults::SettingDefaults;
    use crate::settings::store::{option_key, MemoryOptions, OptionStore};

    fn assets_with(options: &[(&str, &str)], needs_togeojson: bool) -> String {
        let mut store = MemoryOptions::new();
        for (id, value) in options {
            store.set(&option_key(id), value).unwrap();
        }
        let defaults = SettingDefaults::new();
        let resolved = Resolved::new(&store, &defaults);
        head_assets(&resolved, needs_togeojson).unwrap()
    }

    #[test]
    fn default_assets_point_at_the_pinned_leaflet_build() {
        let html = assets_with(&[], false);
        assert!(html.contains(
            "<link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@1.7.1/dist/leaflet.css\" />"
        ));
        assert!(html
            .contains("<script src=\"https://unpkg.com/leaflet@1.7.1/dist/leaflet.js\"></script>"));
    }

    #[test]
    fn togeojson_loads_only_when_a_converted_layer_needs_it() {
        let html = assets_with(&[], false);
        assert!(!html.contains("togeojson"));

        let html = assets_with(&[], true);
        assert!(html.contains(
            "<script src=\"https://unpkg.com/@mapbox/togeojson@0.16.0/togeojson.js\"></script>"
        ));
    }

    #[test]
    fn overridden_urls_replace_the_defaults() {
        let html = assets_with(&[("js_url", "https://cdn.example/leaflet.js")], false);
        assert!(html.contains("<script src=\"https://cdn.example/leaflet.js\"></script>"));
        assert!(!html.contains("unpkg.com/leaflet@1.7.1/dist/leaflet.js"));
    }

    #[test]
    fn urls_are_attribute_escaped() {
        let html = assets_with(&[("css_url", "https://cdn.example/a.css?x=\"1\"&y=2")], false);
        assert!(html.contains("href=\"https://cdn.example/a.css?x=&quot;1&quot;&amp;y=2\""));
    }

    #[test]
    fn bootstrap_defines_every_helper_the_snippets_call() {
        let html = assets_with(&[], false);
        assert!(html.contains("window.WPLeafletMapPlugin = plugin;"));
        for helper in [
            "maps: []",
            "markers: []",
            "getCurrentMap:",
            "unescape:",
            "getGeoJson:",
            "getKml:",
            "getGpx:",
            "getImageOverlay:",
        ] {
            assert!(html.contains(helper), "bootstrap is missing {}", helper);
        }
        assert!(html.contains("queued[i]();"));
    }
}
