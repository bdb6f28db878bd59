//! Declarative settings schema.
//!
//! Field definitions are plain const data; [`SettingsSchema::build`] turns
//! them into sections with display defaults resolved against the
//! [`SettingDefaults`](super::defaults::SettingDefaults) table. The admin page
//! and the CLI both render from this one structure, so a field added here
//! shows up everywhere.

use crate::error::{LeafpressError, Result};
use crate::settings::defaults::SettingDefaults;
use serde::Serialize;

/// Form control a setting renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Number,
    Text,
    Checkbox,
    Select,
    SelectMulti,
    Textarea,
    Color,
    Image,
}

/// Where a field's display default comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDefault {
    /// Look the id up in the defaults table.
    Storage,
    /// A fixed literal, decoupled from what storage falls back to. Used for
    /// the API key fields, which display a hint but store an empty string.
    Fixed(&'static str),
    /// Fixed list, for multi-selects.
    List(&'static [&'static str]),
}

/// A single setting definition.
#[derive(Debug, Clone, Serialize)]
pub struct SettingDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    #[serde(skip)]
    pub default: SchemaDefault,
    pub options: &'static [(&'static str, &'static str)],
    pub description: &'static str,
    pub placeholder: &'static str,
    /// Skipped by `reset_to_defaults`; set on fields holding entered keys.
    pub noreset: bool,
}

impl SettingDefinition {
    pub const fn new(id: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            label,
            kind,
            default: SchemaDefault::Storage,
            options: &[],
            description: "",
            placeholder: "",
            noreset: false,
        }
    }

    pub const fn description(mut self, text: &'static str) -> Self {
        self.description = text;
        self
    }

    pub const fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = text;
        self
    }

    pub const fn options(mut self, options: &'static [(&'static str, &'static str)]) -> Self {
        self.options = options;
        self
    }

    pub const fn fixed_default(mut self, value: &'static str) -> Self {
        self.default = SchemaDefault::Fixed(value);
        self
    }

    pub const fn list_default(mut self, values: &'static [&'static str]) -> Self {
        self.default = SchemaDefault::List(values);
        self
    }

    pub const fn noreset(mut self) -> Self {
        self.noreset = true;
        self
    }
}

pub const STANDARD_FIELDS: &[SettingDefinition] = &[
    SettingDefinition::new("default_lat", "Default Latitude", FieldKind::Number)
        .description("Default latitude for maps. <code>[leaflet-map lat=\"44.67\"]</code>"),
    SettingDefinition::new("default_lng", "Default Longitude", FieldKind::Number)
        .description("Default longitude for maps. <code>[leaflet-map lng=\"-63.61\"]</code>"),
    SettingDefinition::new("default_zoom", "Default Zoom", FieldKind::Number)
        .description("Default zoom for maps. <code>[leaflet-map zoom=\"5\"]</code>"),
    SettingDefinition::new("default_height", "Default Height", FieldKind::Text).description(
        "Default height for maps. Values can include \"px\" but it is not necessary. \
         Can also be \"%\". <code>[leaflet-map height=\"250\"]</code>",
    ),
    SettingDefinition::new("default_width", "Default Width", FieldKind::Text).description(
        "Default width for maps. Values can include \"px\" but it is not necessary. \
         Can also be \"%\". <code>[leaflet-map width=\"100%\"]</code>",
    ),
    SettingDefinition::new("fit_markers", "Fit Bounds", FieldKind::Checkbox).description(
        "If enabled, all markers on each map will alter the view of the map so that it \
         fits their bounds. <code>[leaflet-map fitbounds]</code>",
    ),
    SettingDefinition::new("show_zoom_controls", "Show Zoom Controls", FieldKind::Checkbox)
        .description(
            "The zoom buttons can be large and annoying. \
             <code>[leaflet-map !zoomcontrol]</code>",
        ),
    SettingDefinition::new("scroll_wheel_zoom", "Scroll Wheel Zoom", FieldKind::Checkbox)
        .description(
            "Sometimes someone wants to scroll down the page, and not zoom the map. \
             <code>[leaflet-map !scrollwheel]</code>",
        ),
    SettingDefinition::new("double_click_zoom", "Double Click Zoom", FieldKind::Checkbox)
        .description(
            "If enabled, your maps will zoom with a double click. \
             <code>[leaflet-map !doubleclickzoom]</code>",
        ),
    SettingDefinition::new("default_min_zoom", "Default Min Zoom", FieldKind::Number).description(
        "Restrict the viewer from zooming in past the minimum zoom. Can be set per map \
         in the shortcode. <code>[leaflet-map min_zoom=\"1\"]</code>",
    ),
    SettingDefinition::new("default_max_zoom", "Default Max Zoom", FieldKind::Number).description(
        "Restrict the viewer from zooming out past the maximum zoom. Can be set per map \
         in the shortcode. <code>[leaflet-map max_zoom=\"10\"]</code>",
    ),
    SettingDefinition::new("default_tiling_service", "Default Tiling Service", FieldKind::Select)
        .options(&[
            ("other", "I will provide my own map tile URL"),
            ("mapquest", "MapQuest (I have an API key)"),
        ])
        .description("Choose a tiling service or provide your own."),
    SettingDefinition::new("mapquest_appkey", "MapQuest API Key (optional)", FieldKind::Text)
        .fixed_default("Supply an API key if you choose MapQuest")
        .noreset()
        .description(
            "If you choose MapQuest, you must provide an API key: sign up, create a new \
             app, then supply the \"Consumer Key\" here.",
        ),
    SettingDefinition::new("map_tile_url", "Map Tile URL", FieldKind::Text).description(
        "Any tile server following the {z}/{x}/{y} convention works. \
         <code>[leaflet-map tileurl=http://{s}.tile.stamen.com/watercolor/{z}/{x}/{y}.jpg \
         subdomains=abcd]</code>",
    ),
    SettingDefinition::new(
        "map_tile_url_subdomains",
        "Map Tile URL Subdomains",
        FieldKind::Text,
    )
    .description(
        "Some maps get tiles from multiple servers with subdomains such as a,b,c,d or \
         1,2,3,4. <code>[leaflet-map subdomains=\"1234\"]</code>",
    ),
    SettingDefinition::new("detect_retina", "Detect Retina", FieldKind::Checkbox).description(
        "Fetch tiles at different zoom levels to appear smoother on retina displays. \
         <code>[leaflet-map detect-retina]</code>",
    ),
    SettingDefinition::new("tilesize", "Tile Size", FieldKind::Text).description(
        "Width and height of tiles (in pixels) in the grid. Default is 256. \
         <code>[leaflet-map tilesize=512]</code>",
    ),
    SettingDefinition::new("mapid", "Tile Id", FieldKind::Text).description(
        "An id that is passed to L.tileLayer; useful for Mapbox. \
         <code>[leaflet-map mapid=\"mapbox/streets-v11\"]</code>",
    ),
    SettingDefinition::new("accesstoken", "Access Token", FieldKind::Text).description(
        "An access token that is passed to L.tileLayer; useful for Mapbox tiles. \
         <code>[leaflet-map accesstoken=\"your.mapbox.access.token\"]</code>",
    ),
    SettingDefinition::new("zoomoffset", "Zoom Offset", FieldKind::Number).description(
        "The zoom number used in tile URLs will be offset with this value. \
         <code>[leaflet-map zoomoffset=\"-1\"]</code>",
    ),
    SettingDefinition::new("tile_no_wrap", "No Wrap (tiles)", FieldKind::Checkbox).description(
        "Whether the layer is wrapped around the antimeridian. \
         <code>[leaflet-map nowrap]</code>",
    ),
    SettingDefinition::new("js_url", "JavaScript URL", FieldKind::Text)
        .description("If you host your own Leaflet files, then paste the URL here."),
    SettingDefinition::new("css_url", "CSS URL", FieldKind::Text).description("Same as above."),
    SettingDefinition::new("default_attribution", "Default Attribution", FieldKind::Textarea)
        .description(
            "Attribution to a custom tile url. Use semi-colons (;) to separate multiple.",
        ),
    SettingDefinition::new("show_scale", "Show Scale", FieldKind::Checkbox).description(
        "Add a scale to each map. Can also be added via shortcode. \
         <code>[leaflet-scale]</code>",
    ),
    SettingDefinition::new("geocoder", "Geocoder", FieldKind::Select)
        .options(&[
            ("osm", "OpenStreetMap Nominatim"),
            ("google", "Google Maps"),
            ("dawa", "Denmark Addresses"),
        ])
        .description(
            "Select the geocoding provider used to resolve addresses given in shortcodes.",
        ),
    SettingDefinition::new("google_appkey", "Google API Key (optional)", FieldKind::Text)
        .fixed_default("Supply a Google API Key")
        .noreset()
        .description(
            "The Google geocoder requires an API key with the Places product enabled. \
             You are unlikely to ever be charged for geocoding.",
        ),
    SettingDefinition::new("togeojson_url", "KML/GPX JavaScript Converter", FieldKind::Text)
        .noreset()
        .description(
            "ToGeoJSON converts KML and GPX files to GeoJSON; if you plan to use \
             [leaflet-kml] or [leaflet-gpx] then this library is loaded. You can change \
             the default if you need.",
        ),
    SettingDefinition::new("shortcode_in_excerpt", "Show maps in excerpts", FieldKind::Checkbox),
];

pub const EXTRA_FIELDS: &[SettingDefinition] = &[
    SettingDefinition::new("number_field", "A Number", FieldKind::Number)
        .fixed_default("")
        .placeholder("42")
        .description(
            "This is a standard number field - if this field contains anything other than \
             numbers then the form will not be submitted.",
        ),
    SettingDefinition::new("colour_picker", "Pick a colour", FieldKind::Color)
        .fixed_default("#21759B")
        .description("The option is stored as the colour's hex code."),
    SettingDefinition::new("an_image", "An Image", FieldKind::Image)
        .fixed_default("")
        .description(
            "This will upload an image to the media library and store the attachment ID \
             in the option field.",
        ),
    SettingDefinition::new("multi_select_box", "A Multi-Select Box", FieldKind::SelectMulti)
        .options(&[("linux", "Linux"), ("mac", "Mac"), ("windows", "Windows")])
        .list_default(&["linux"])
        .description("A standard multi-select box - the saved data is stored as an array."),
];

/// Find a definition by id across all sections.
pub fn get_definition(id: &str) -> Option<&'static SettingDefinition> {
    STANDARD_FIELDS
        .iter()
        .chain(EXTRA_FIELDS.iter())
        .find(|def| def.id == id)
}

/// A field with its display default resolved.
#[derive(Debug, Clone, Serialize)]
pub struct SettingField {
    #[serde(flatten)]
    pub def: &'static SettingDefinition,
    /// Display default shown in forms. Multi-select defaults are
    /// comma-joined.
    pub default: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsSection {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: Vec<SettingField>,
}

/// Hook for hosts to amend the built sections (append fields, add a section).
/// Extensions run in registration order after the base build.
pub type SchemaExtension = fn(Vec<SettingsSection>) -> Vec<SettingsSection>;

#[derive(Debug, Clone)]
pub struct SettingsSchema {
    sections: Vec<SettingsSection>,
}

impl SettingsSchema {
    pub fn build(defaults: &SettingDefaults) -> Result<Self> {
        Self::build_with(defaults, &[])
    }

    /// Build the base sections and run `extensions` over them. Ids must stay
    /// unique across the flattened result; a clash is
    /// [`LeafpressError::DuplicateSetting`], never a silently ambiguous
    /// schema.
    pub fn build_with(defaults: &SettingDefaults, extensions: &[SchemaExtension]) -> Result<Self> {
        let mut sections = vec![
            SettingsSection {
                key: "standard",
                title: "Standard",
                description: "These are fairly standard form input fields.",
                fields: resolve_fields(STANDARD_FIELDS, defaults)?,
            },
            SettingsSection {
                key: "extra",
                title: "Extra",
                description: "These are some extra input fields that maybe aren't as common \
                              as the others.",
                fields: resolve_fields(EXTRA_FIELDS, defaults)?,
            },
        ];

        for extend in extensions {
            sections = extend(sections);
        }

        let mut seen: Vec<&str> = Vec::new();
        for section in &sections {
            for field in &section.fields {
                if seen.contains(&field.def.id) {
                    return Err(LeafpressError::DuplicateSetting(field.def.id.to_string()));
                }
                seen.push(field.def.id);
            }
        }

        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[SettingsSection] {
        &self.sections
    }

    pub fn field(&self, id: &str) -> Option<&SettingField> {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter())
            .find(|field| field.def.id == id)
    }

    /// Ids of fields that survive a reset.
    pub fn noreset_ids(&self) -> Vec<&'static str> {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter())
            .filter(|field| field.def.noreset)
            .map(|field| field.def.id)
            .collect()
    }
}

fn resolve_fields(
    definitions: &'static [SettingDefinition],
    defaults: &SettingDefaults,
) -> Result<Vec<SettingField>> {
    definitions
        .iter()
        .map(|def| {
            let default = match def.default {
                SchemaDefault::Storage => defaults.get(def.id)?.unwrap_or("").to_string(),
                SchemaDefault::Fixed(value) => value.to_string(),
                SchemaDefault::List(values) => values.join(","),
            };
            Ok(SettingField { def, default })
        })
        .collect()
}
