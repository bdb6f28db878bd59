//! Built-in defaults for every map setting.
//!
//! This table is the single source of truth for what a setting falls back to
//! when nothing is stored. A handful of settings (`tilesize`, `mapid`,
//! `accesstoken`, `zoomoffset`) deliberately have no default at all: they are
//! only forwarded to the tile layer when someone provides them.

use crate::error::{LeafpressError, Result};
use std::collections::BTreeMap;

/// Leaflet release the bundled CDN URLs point at. Bumping this changes both
/// the script and stylesheet defaults.
pub const LEAFLET_VERSION: &str = "1.7.1";

/// Default URL of the KML/GPX to GeoJSON converter script.
pub const TOGEOJSON_URL: &str = "https://unpkg.com/@mapbox/togeojson@0.16.0/togeojson.js";

/// Static defaults for all known settings.
///
/// Every valid setting id has an entry; [`SettingDefaults::get`] on anything
/// else is a hard error rather than a silent `None`, so typos in setting
/// names surface immediately.
#[derive(Debug, Clone)]
pub struct SettingDefaults {
    values: BTreeMap<&'static str, Option<String>>,
}

impl SettingDefaults {
    pub fn new() -> Self {
        let mut values: BTreeMap<&'static str, Option<String>> = BTreeMap::new();
        let mut set = |key: &'static str, value: &str| {
            values.insert(key, Some(value.to_string()));
        };

        set("default_lat", "44.67");
        set("default_lng", "-63.61");
        set("default_zoom", "12");
        set("default_height", "250");
        set("default_width", "100%");
        set("fit_markers", "0");
        set("show_zoom_controls", "0");
        set("scroll_wheel_zoom", "0");
        set("double_click_zoom", "0");
        set("default_min_zoom", "0");
        set("default_max_zoom", "20");
        set("default_tiling_service", "other");
        set("mapquest_appkey", "");
        set(
            "map_tile_url",
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
        );
        set("map_tile_url_subdomains", "abc");
        set("detect_retina", "0");
        set("tile_no_wrap", "0");
        set(
            "js_url",
            &format!("https://unpkg.com/leaflet@{}/dist/leaflet.js", LEAFLET_VERSION),
        );
        set(
            "css_url",
            &format!("https://unpkg.com/leaflet@{}/dist/leaflet.css", LEAFLET_VERSION),
        );
        set(
            "default_attribution",
            concat!(
                "<a href=\"http://leafletjs.com\" title=\"A JS library for interactive maps\">Leaflet</a>; ",
                "© <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
            ),
        );
        set("show_scale", "0");
        set("geocoder", "osm");
        set("google_appkey", "");
        set("togeojson_url", TOGEOJSON_URL);
        set("shortcode_in_excerpt", "0");

        for key in ["tilesize", "mapid", "accesstoken", "zoomoffset"] {
            values.insert(key, None);
        }

        Self { values }
    }

    /// Default for a setting, `None` when the setting intentionally has no
    /// default. Unknown ids are an error.
    pub fn get(&self, key: &str) -> Result<Option<&str>> {
        self.values
            .get(key)
            .map(|v| v.as_deref())
            .ok_or_else(|| LeafpressError::UnknownSetting(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for SettingDefaults {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_setting_has_default() {
        let defaults = SettingDefaults::new();
        assert_eq!(defaults.get("default_lat").unwrap(), Some("44.67"));
        assert_eq!(defaults.get("default_zoom").unwrap(), Some("12"));
        assert_eq!(defaults.get("geocoder").unwrap(), Some("osm"));
    }

    #[test]
    fn unknown_setting_is_an_error() {
        let defaults = SettingDefaults::new();
        let err = defaults.get("no_such_setting").unwrap_err();
        assert!(matches!(
            err,
            crate::error::LeafpressError::UnknownSetting(key) if key == "no_such_setting"
        ));
    }

    #[test]
    fn defaultless_settings_yield_none() {
        let defaults = SettingDefaults::new();
        for key in ["tilesize", "mapid", "accesstoken", "zoomoffset"] {
            assert_eq!(defaults.get(key).unwrap(), None, "{}", key);
        }
    }

    #[test]
    fn cdn_urls_follow_the_pinned_version() {
        let defaults = SettingDefaults::new();
        let js = defaults.get("js_url").unwrap().unwrap();
        let css = defaults.get("css_url").unwrap().unwrap();
        assert!(js.contains(LEAFLET_VERSION));
        assert!(js.ends_with("leaflet.js"));
        assert!(css.contains(LEAFLET_VERSION));
        assert!(css.ends_with("leaflet.css"));
    }

    #[test]
    fn api_keys_default_to_empty_not_missing() {
        let defaults = SettingDefaults::new();
        assert_eq!(defaults.get("mapquest_appkey").unwrap(), Some(""));
        assert_eq!(defaults.get("google_appkey").unwrap(), Some(""));
    }

    #[test]
    fn table_covers_all_settings() {
        let defaults = SettingDefaults::new();
        assert_eq!(defaults.len(), 29);
    }
}
