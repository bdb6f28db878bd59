//! Settings page rendering.
//!
//! The admin page is pure string building over the schema: a tabbed form
//! with one section visible at a time, each field rendered by kind with its
//! current value filled in. Values come from [`Resolved::raw`], not the
//! falsy-fallback getter. A form must show exactly what is stored, or
//! saving it would silently rewrite values the author never touched.

use crate::settings::schema::{FieldKind, SettingField, SettingsSchema, SettingsSection};
use crate::settings::store::{option_key, Resolved};
use crate::style::parse_bool;

/// Page slug, also the wrapper div id.
pub const SETTINGS_PAGE: &str = "wppt_settings";

/// The settings link shown beside the plugin in a plugin list.
pub fn settings_link() -> String {
    format!(
        "<a href=\"options-general.php?page={}\">Settings</a>",
        SETTINGS_PAGE
    )
}

/// Render the full settings page. `active_tab` picks the section by key;
/// a missing or unknown tab shows the first section.
pub fn render_settings_page(
    schema: &SettingsSchema,
    settings: &Resolved<'_>,
    active_tab: Option<&str>,
) -> String {
    let sections = schema.sections();
    let active = sections
        .iter()
        .find(|section| Some(section.key) == active_tab)
        .or_else(|| sections.first());

    let mut html = String::new();
    html.push_str(&format!("<div class=\"wrap\" id=\"{}\">\n", SETTINGS_PAGE));
    html.push_str("<h2>Leafpress Settings</h2>\n");

    if sections.len() > 1 {
        html.push_str("<h2 class=\"nav-tab-wrapper\">\n");
        for section in sections {
            let class = if active.map(|a| a.key) == Some(section.key) {
                "nav-tab nav-tab-active"
            } else {
                "nav-tab"
            };
            html.push_str(&format!(
                "<a href=\"?page={}&tab={}\" class=\"{}\">{}</a>\n",
                SETTINGS_PAGE, section.key, class, section.title
            ));
        }
        html.push_str("</h2>\n");
    }

    html.push_str("<form method=\"post\" action=\"options.php\" enctype=\"multipart/form-data\">\n");
    if let Some(section) = active {
        render_section(&mut html, section, settings);
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"tab\" value=\"{}\" />\n",
            section.key
        ));
    }
    html.push_str(
        "<p class=\"submit\"><input type=\"submit\" class=\"button-primary\" value=\"Save Settings\" /></p>\n",
    );
    html.push_str("</form>\n</div>\n");
    html
}

fn render_section(html: &mut String, section: &SettingsSection, settings: &Resolved<'_>) {
    html.push_str(&format!("<h3>{}</h3>\n", section.title));
    if !section.description.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", section.description));
    }
    html.push_str("<table class=\"form-table\">\n");
    for field in &section.fields {
        render_field(html, field, settings);
    }
    html.push_str("</table>\n");
}

fn render_field(html: &mut String, field: &SettingField, settings: &Resolved<'_>) {
    let def = field.def;
    let value = settings.raw(def.id).unwrap_or_else(|| field.default.clone());
    let name = option_key(def.id);

    html.push_str(&format!(
        "<tr valign=\"top\"><th scope=\"row\"><label for=\"{}\">{}</label></th>\n<td>",
        def.id, def.label
    ));

    match def.kind {
        FieldKind::Number | FieldKind::Text => {
            let input_type = if def.kind == FieldKind::Number {
                "number"
            } else {
                "text"
            };
            html.push_str(&format!(
                "<input id=\"{}\" type=\"{}\" name=\"{}\" placeholder=\"{}\" value=\"{}\" />",
                def.id,
                input_type,
                name,
                escape_attr(def.placeholder),
                escape_attr(&value)
            ));
        }
        FieldKind::Checkbox => {
            let checked = if parse_bool(&value).unwrap_or(false) {
                " checked=\"checked\""
            } else {
                ""
            };
            html.push_str(&format!(
                "<input id=\"{}\" type=\"checkbox\" name=\"{}\" value=\"1\"{} />",
                def.id, name, checked
            ));
        }
        FieldKind::Select => {
            html.push_str(&format!("<select id=\"{}\" name=\"{}\">", def.id, name));
            for (option_value, option_label) in def.options.iter().copied() {
                let selected = if option_value == value {
                    " selected=\"selected\""
                } else {
                    ""
                };
                html.push_str(&format!(
                    "<option value=\"{}\"{}>{}</option>",
                    option_value, selected, option_label
                ));
            }
            html.push_str("</select>");
        }
        FieldKind::SelectMulti => {
            // Multi-select values are stored comma-joined.
            let chosen: Vec<&str> = value
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .collect();
            html.push_str(&format!(
                "<select id=\"{}\" name=\"{}[]\" multiple=\"multiple\">",
                def.id, name
            ));
            for (option_value, option_label) in def.options.iter().copied() {
                let selected = if chosen.contains(&option_value) {
                    " selected=\"selected\""
                } else {
                    ""
                };
                html.push_str(&format!(
                    "<option value=\"{}\"{}>{}</option>",
                    option_value, selected, option_label
                ));
            }
            html.push_str("</select>");
        }
        FieldKind::Textarea => {
            html.push_str(&format!(
                "<textarea id=\"{}\" rows=\"5\" cols=\"50\" name=\"{}\">{}</textarea>",
                def.id,
                name,
                escape_attr(&value)
            ));
        }
        FieldKind::Color => {
            html.push_str(&format!(
                "<div class=\"color-picker\" style=\"position:relative;\">\
                 <input id=\"{}\" type=\"text\" name=\"{}\" class=\"color\" value=\"{}\" />\
                 <div style=\"position:absolute;background:#FFF;z-index:99;border-radius:100%;\" class=\"colorpicker\"></div>\
                 </div>",
                def.id,
                name,
                escape_attr(&value)
            ));
        }
        FieldKind::Image => {
            html.push_str(&format!(
                "<img id=\"{}_preview\" class=\"image_preview\" src=\"{}\" /><br/>\
                 <input id=\"{}_button\" type=\"button\" class=\"image_upload_button button\" value=\"Upload new image\" />\
                 <input id=\"{}_delete\" type=\"button\" class=\"image_delete_button button\" value=\"Remove image\" />\
                 <input id=\"{}\" class=\"image_data_field\" type=\"hidden\" name=\"{}\" value=\"{}\" />",
                def.id,
                escape_attr(&value),
                def.id,
                def.id,
                def.id,
                name,
                escape_attr(&value)
            ));
        }
    }

    let mut description = def.description.to_string();
    if def.noreset {
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str("Not affected by reset.");
    }
    if !description.is_empty() {
        if def.kind == FieldKind::Checkbox {
            html.push_str(&format!("<span class=\"description\">{}</span>", description));
        } else {
            html.push_str(&format!(
                "<br/><span class=\"description\">{}</span>",
                description
            ));
        }
    }

    html.push_str("</td></tr>\n");
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
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
