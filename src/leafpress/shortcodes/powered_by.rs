use crate::error::Result;
use crate::render::RenderContext;
use crate::shortcodes::Shortcode;
use shortscan::Attrs;

/// `[wppt_powered_by]` attribution line. Enclosed content is appended after
/// the line with its own shortcodes expanded.
pub struct PoweredBy;

impl Shortcode for PoweredBy {
    fn render(
        &self,
        ctx: &mut RenderContext,
        _attrs: &Attrs,
        content: Option<&str>,
    ) -> Result<String> {
        let mut html = String::from("<p class=\"powered-by\">Powered by Leafpress</p>");
        if let Some(content) = content {
            html.push_str(&ctx.expand_inner(content));
        }
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use crate::render::expand;
    use crate::settings::defaults::SettingDefaults;
    use crate::settings::store::MemoryOptions;
    use crate::settings::Resolved;
    use crate::shortcodes::ShortcodeRegistry;

    fn run(content: &str) -> String {
        let store = MemoryOptions::new();
        let defaults = SettingDefaults::new();
        let mut registry = ShortcodeRegistry::new();
        registry.register_builtins();
        expand(content, &registry, Resolved::new(&store, &defaults)).html
    }

    #[test]
    fn emits_the_attribution_line() {
        let html = run("[wppt_powered_by]");
        assert_eq!(html, "<p class=\"powered-by\">Powered by Leafpress</p>");
    }

    #[test]
    fn enclosed_content_is_re_expanded() {
        let html = run("[wppt_powered_by]and [leaflet-scale][/wppt_powered_by]");
        assert!(html.starts_with("<p class=\"powered-by\">Powered by Leafpress</p>and "));
        assert!(html.contains("L.control.scale("));
    }
}
