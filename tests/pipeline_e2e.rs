//! End-to-end rendering through the `Plugin` facade, the way a host embeds
//! the library: one plugin over a memory store, content in, HTML out.

use leafpress::plugin::Plugin;
use leafpress::render::MessageLevel;
use leafpress::settings::store::MemoryOptions;

fn plugin() -> Plugin<MemoryOptions> {
    Plugin::new(MemoryOptions::new()).unwrap()
}

#[test]
fn a_full_post_renders_every_tag_in_document_order() {
    let plugin = plugin();
    let post = concat!(
        "Intro text.\n",
        "[leaflet-map lat=44.67 lng=-63.61 zoom=13]\n",
        "[leaflet-marker lat=44.68 lng=-63.6]A popup[/leaflet-marker]\n",
        "[leaflet-circle lat=44.67 lng=-63.61 radius=500 color=\"#f00\"]\n",
        "Outro text.\n",
    );
    let output = plugin.render_content(post);

    assert!(output.html.contains("Intro text."));
    assert!(output.html.contains("<div id=\"leaflet-map-1\""));
    assert!(output.html.contains("L.map('leaflet-map-1'"));
    assert!(output.html.contains("map.setView([44.67, -63.61], 13);"));
    assert!(output.html.contains("var marker = L.marker([44.68, -63.6]"));
    assert!(output
        .html
        .contains("marker.bindPopup(window.WPLeafletMapPlugin.unescape('A popup'));"));
    assert!(output.html.contains("var circle = L.circle([44.67, -63.61]"));
    assert!(output.html.contains("\"radius\":500.0"));
    assert!(output.html.contains("Outro text."));
    assert_eq!(output.maps, 1);
    assert!(!output.needs_togeojson);
    assert!(output.messages.is_empty());

    let map_pos = output.html.find("leaflet-map-1").unwrap();
    let marker_pos = output.html.find("L.marker").unwrap();
    let circle_pos = output.html.find("L.circle").unwrap();
    assert!(map_pos < marker_pos);
    assert!(marker_pos < circle_pos);
}

#[test]
fn escaped_and_unknown_tags_pass_through() {
    let plugin = plugin();
    let output = plugin.render_content("Use [[leaflet-map]] to embed. [not-a-tag attr=1]");
    assert!(output.html.contains("[leaflet-map]"));
    assert!(!output.html.contains("[[leaflet-map]]"));
    assert!(output.html.contains("[not-a-tag attr=1]"));
    assert_eq!(output.maps, 0);
}

#[test]
fn stored_settings_change_the_next_render() {
    let mut plugin = plugin();
    let before = plugin.render_content("[leaflet-map]");
    assert!(before.html.contains("map.setView([44.67, -63.61], 12);"));

    plugin.set_option("default_lat", "51.5").unwrap();
    plugin.set_option("default_lng", "-0.12").unwrap();
    plugin.set_option("default_zoom", "10").unwrap();

    let after = plugin.render_content("[leaflet-map]");
    assert!(after.html.contains("map.setView([51.5, -0.12], 10);"));
}

#[test]
fn kml_layers_pull_the_converter_into_the_head() {
    let plugin = plugin();
    let post = "[leaflet-map][leaflet-kml src=\"https://example.com/tour.kml\"]";
    let output = plugin.render_content(post);
    assert!(output
        .html
        .contains("window.WPLeafletMapPlugin.getKml('https://example.com/tour.kml'"));
    assert!(output.needs_togeojson);

    let head = plugin.head_assets(output.needs_togeojson).unwrap();
    assert!(head.contains("leaflet.css"));
    assert!(head.contains("leaflet.js"));
    assert!(head.contains("togeojson.js"));

    let plain = plugin.head_assets(false).unwrap();
    assert!(!plain.contains("togeojson.js"));
}

#[test]
fn markdown_rendering_leaves_scripts_intact() {
    let plugin = plugin();
    let output = plugin.render_markdown("# Trip\n\nSome *notes*.\n\n[leaflet-map]");
    assert!(output.html.contains("<h1>Trip</h1>"));
    assert!(output.html.contains("<em>notes</em>"));
    assert!(output.html.contains("style=\"height:250px; width:100%;\""));
    assert!(output.html.contains("L.map('leaflet-map-1'"));
}

#[test]
fn every_map_gets_its_own_numbered_div() {
    let plugin = plugin();
    let output = plugin.render_content("[leaflet-map][leaflet-map][leaflet-map]");
    assert_eq!(output.maps, 3);
    for n in 1..=3 {
        assert!(output.html.contains(&format!("<div id=\"leaflet-map-{}\"", n)));
        assert!(output.html.contains(&format!("L.map('leaflet-map-{}'", n)));
    }

    // Numbering is per render pass, not global.
    let second = plugin.render_content("[leaflet-map]");
    assert!(second.html.contains("leaflet-map-1"));
    assert_eq!(second.maps, 1);
}

#[test]
fn bad_attributes_warn_without_killing_the_page() {
    let plugin = plugin();
    let output = plugin
        .render_content("[leaflet-map zoom=high][leaflet-geojson][leaflet-marker lat=1 lng=2]");

    assert!(output.html.contains("map.setView([44.67, -63.61], 12);"));
    assert!(!output.html.contains("getGeoJson"));
    assert!(output.html.contains("L.marker([1, 2]"));

    assert_eq!(output.messages.len(), 2);
    assert!(output
        .messages
        .iter()
        .all(|message| message.level == MessageLevel::Warning));
    assert!(output.messages.iter().any(|m| m.text.contains("zoom")));
    assert!(output
        .messages
        .iter()
        .any(|m| m.text.contains("[leaflet-geojson]")));
}

#[test]
fn reset_keeps_api_keys_and_purge_removes_them() {
    let mut plugin = plugin();
    plugin.set_option("google_appkey", "secret-key").unwrap();
    plugin.set_option("default_zoom", "3").unwrap();

    plugin.reset_to_defaults().unwrap();
    assert_eq!(plugin.setting("default_zoom").unwrap().as_deref(), Some("12"));
    assert_eq!(
        plugin.setting("google_appkey").unwrap().as_deref(),
        Some("secret-key")
    );

    plugin.purge().unwrap();
    assert_eq!(plugin.setting("google_appkey").unwrap().as_deref(), Some(""));
    assert_eq!(plugin.setting("default_zoom").unwrap().as_deref(), Some("12"));
}

#[test]
fn auxiliary_tags_render_alongside_maps() {
    let mut plugin = plugin();
    plugin.set_option("show_scale", "1").unwrap();

    let output = plugin.render_content("[wppt_powered_by][leaflet-map][leaflet-scale imperial=0]");
    assert!(output.html.contains("<p class=\"powered-by\">"));
    assert!(output.html.contains("L.control.scale().addTo(map);"));
    assert!(output.html.contains("L.control.scale({\"imperial\": false,})"));
}
