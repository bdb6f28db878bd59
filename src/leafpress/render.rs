//! The expansion pipeline.
//!
//! [`expand`] walks a piece of content once, replacing registered shortcodes
//! with generated markup and leaving everything else byte-for-byte intact.
//! Handlers run against a [`RenderContext`], which carries the resolved
//! settings, the per-render map counter, and the warning channel.
//!
//! Failures stay local: a handler error drops that one tag from the output
//! and surfaces as a warning on the [`RenderOutput`], so a bad shortcode in
//! a post can never take the rest of the page down with it.

use crate::settings::Resolved;
use crate::shortcodes::ShortcodeRegistry;
use pulldown_cmark::{html, Options, Parser};
use shortscan::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message produced while rendering or mutating options. These are
/// returned to the caller, not printed; the CLI decides presentation.
#[derive(Debug, Clone)]
pub struct RenderMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl RenderMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything one expansion produced.
#[derive(Debug)]
pub struct RenderOutput {
    pub html: String,
    /// Number of maps emitted; the asset step needs to know if any exist.
    pub maps: u32,
    /// Set when a KML or GPX layer was rendered, which needs the converter
    /// script in the page head.
    pub needs_togeojson: bool,
    pub messages: Vec<RenderMessage>,
}

/// State shared by all handlers within one expansion.
pub struct RenderContext<'a> {
    settings: Resolved<'a>,
    registry: &'a ShortcodeRegistry,
    maps: u32,
    togeojson: bool,
    messages: Vec<RenderMessage>,
}

impl<'a> RenderContext<'a> {
    pub fn new(settings: Resolved<'a>, registry: &'a ShortcodeRegistry) -> Self {
        Self {
            settings,
            registry,
            maps: 0,
            togeojson: false,
            messages: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Resolved<'a> {
        &self.settings
    }

    /// Allocate the next map id, starting at 1. Later shapes attach to the
    /// most recent map on the client side.
    pub fn next_map_id(&mut self) -> u32 {
        self.maps += 1;
        self.maps
    }

    pub fn map_count(&self) -> u32 {
        self.maps
    }

    pub fn mark_togeojson(&mut self) {
        self.togeojson = true;
    }

    pub fn needs_togeojson(&self) -> bool {
        self.togeojson
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.messages.push(RenderMessage::warning(text));
    }

    pub fn push_messages(&mut self, messages: Vec<RenderMessage>) {
        self.messages.extend(messages);
    }

    /// Expand nested content inside a handler, sharing this context's
    /// counters. Nested content is never treated as markdown.
    pub fn expand_inner(&mut self, content: &str) -> String {
        self.expand_with(content, false)
    }

    fn expand_with(&mut self, content: &str, markdown: bool) -> String {
        let registry = self.registry;
        let events = shortscan::scan(content, |tag| registry.contains(tag));

        let mut out = String::with_capacity(content.len());
        for event in events {
            match event {
                Event::Text(text) => {
                    if markdown {
                        push_markdown(&mut out, text);
                    } else {
                        out.push_str(text);
                    }
                }
                // The payload already carries single brackets.
                Event::Escaped(literal) => out.push_str(literal),
                Event::Tag(tag) => {
                    if let Some(entry) = registry.get(tag.name) {
                        match entry.render(self, &tag.attrs, tag.content) {
                            Ok(rendered) => out.push_str(&rendered),
                            Err(error) => {
                                self.warn(format!("[{}] skipped: {}", tag.name, error));
                            }
                        }
                    } else {
                        out.push_str(tag.raw);
                    }
                }
            }
        }
        out
    }
}

fn push_markdown(out: &mut String, text: &str) {
    let options = Options::all();
    let parser = Parser::new_ext(text, options);
    html::push_html(out, parser);
}

/// Expand shortcodes in `content`, leaving surrounding text as-is.
pub fn expand(
    content: &str,
    registry: &ShortcodeRegistry,
    settings: Resolved<'_>,
) -> RenderOutput {
    expand_impl(content, registry, settings, false)
}

/// Expand shortcodes and render the text between them as markdown. Tags are
/// dispatched from the raw input, so shortcodes are never mangled by the
/// markdown pass.
pub fn expand_markdown(
    content: &str,
    registry: &ShortcodeRegistry,
    settings: Resolved<'_>,
) -> RenderOutput {
    expand_impl(content, registry, settings, true)
}

fn expand_impl(
    content: &str,
    registry: &ShortcodeRegistry,
    settings: Resolved<'_>,
    markdown: bool,
) -> RenderOutput {
    let mut ctx = RenderContext::new(settings, registry);
    let html = ctx.expand_with(content, markdown);
    RenderOutput {
        html,
        maps: ctx.maps,
        needs_togeojson: ctx.togeojson,
        messages: ctx.messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LeafpressError, Result};
    use crate::settings::defaults::SettingDefaults;
    use crate::settings::store::MemoryOptions;
    use crate::shortcodes::{Shortcode, ShortcodeKind};
    use shortscan::Attrs;

    struct Shout;

    impl Shortcode for Shout {
        fn render(
            &self,
            _ctx: &mut RenderContext,
            _attrs: &Attrs,
            content: Option<&str>,
        ) -> Result<String> {
            Ok(content.unwrap_or("").to_uppercase())
        }
    }

    struct Wrap;

    impl Shortcode for Wrap {
        fn render(
            &self,
            ctx: &mut RenderContext,
            _attrs: &Attrs,
            content: Option<&str>,
        ) -> Result<String> {
            let inner = ctx.expand_inner(content.unwrap_or(""));
            Ok(format!("({})", inner))
        }
    }

    struct Boom;

    impl Shortcode for Boom {
        fn render(
            &self,
            _ctx: &mut RenderContext,
            _attrs: &Attrs,
            _content: Option<&str>,
        ) -> Result<String> {
            Err(LeafpressError::Render("no can do".to_string()))
        }
    }

    struct Converted;

    impl Shortcode for Converted {
        fn render(
            &self,
            ctx: &mut RenderContext,
            _attrs: &Attrs,
            _content: Option<&str>,
        ) -> Result<String> {
            ctx.mark_togeojson();
            Ok(String::new())
        }
    }

    struct Counter;

    impl Shortcode for Counter {
        fn render(
            &self,
            ctx: &mut RenderContext,
            _attrs: &Attrs,
            _content: Option<&str>,
        ) -> Result<String> {
            Ok(format!("#{}", ctx.next_map_id()))
        }
    }

    fn test_registry() -> ShortcodeRegistry {
        let mut registry = ShortcodeRegistry::new();
        registry
            .register("shout", ShortcodeKind::Standard, Box::new(Shout))
            .unwrap();
        registry
            .register("wrap", ShortcodeKind::Standard, Box::new(Wrap))
            .unwrap();
        registry
            .register("boom", ShortcodeKind::Standard, Box::new(Boom))
            .unwrap();
        registry
            .register("conv", ShortcodeKind::Leaflet, Box::new(Converted))
            .unwrap();
        registry
            .register("count", ShortcodeKind::Leaflet, Box::new(Counter))
            .unwrap();
        registry
    }

    fn run(content: &str) -> RenderOutput {
        let store = MemoryOptions::new();
        let defaults = SettingDefaults::new();
        let registry = test_registry();
        expand(content, &registry, Resolved::new(&store, &defaults))
    }

    #[test]
    fn plain_text_passes_through() {
        let output = run("nothing special here");
        assert_eq!(output.html, "nothing special here");
        assert_eq!(output.maps, 0);
        assert!(output.messages.is_empty());
    }

    #[test]
    fn registered_tags_are_replaced() {
        let output = run("say [shout]hello[/shout]!");
        assert_eq!(output.html, "say HELLO!");
    }

    #[test]
    fn unregistered_tags_stay_literal() {
        let output = run("a [gallery id=\"3\"] here");
        assert_eq!(output.html, "a [gallery id=\"3\"] here");
    }

    #[test]
    fn escaped_tags_render_with_single_brackets() {
        let output = run("type [[shout]] to shout");
        assert_eq!(output.html, "type [shout] to shout");
    }

    #[test]
    fn handler_errors_become_warnings() {
        let output = run("before [boom] after");
        assert_eq!(output.html, "before  after");
        assert_eq!(output.messages.len(), 1);
        assert_eq!(output.messages[0].level, MessageLevel::Warning);
        assert!(output.messages[0].text.contains("[boom] skipped"));
        assert!(output.messages[0].text.contains("no can do"));
    }

    #[test]
    fn nested_content_is_expanded() {
        let output = run("[wrap]x [shout]y[/shout][/wrap]");
        assert_eq!(output.html, "(x Y)");
    }

    #[test]
    fn map_counter_spans_the_whole_render() {
        let output = run("[count] [count] [count]");
        assert_eq!(output.html, "#1 #2 #3");
        assert_eq!(output.maps, 3);
    }

    #[test]
    fn togeojson_flag_is_reported() {
        assert!(!run("plain").needs_togeojson);
        assert!(run("[conv]").needs_togeojson);
    }

    #[test]
    fn markdown_applies_to_text_only() {
        let store = MemoryOptions::new();
        let defaults = SettingDefaults::new();
        let registry = test_registry();
        let output = expand_markdown(
            "# Title\n\n[shout]quiet[/shout]",
            &registry,
            Resolved::new(&store, &defaults),
        );
        assert!(output.html.contains("<h1>Title</h1>"));
        assert!(output.html.contains("QUIET"));
        assert!(!output.html.contains("[shout]"));
    }
}
