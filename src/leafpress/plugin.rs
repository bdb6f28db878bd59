//! Plugin facade.
//!
//! Ties the layers together behind one type: an injected option store, the
//! built defaults and schema, and a shortcode registry with the builtin tags
//! registered. Hosts construct one `Plugin` and drive everything through
//! it; nothing in the crate reaches for global state.

use crate::admin;
use crate::assets;
use crate::error::{LeafpressError, Result};
use crate::render::{self, RenderMessage, RenderOutput};
use crate::settings::defaults::SettingDefaults;
use crate::settings::schema::{SchemaExtension, SettingsSchema};
use crate::settings::store::{self, option_key, OptionStore, Resolved};
use crate::shortcodes::ShortcodeRegistry;

pub struct Plugin<S: OptionStore> {
    store: S,
    defaults: SettingDefaults,
    schema: SettingsSchema,
    registry: ShortcodeRegistry,
    startup: Vec<RenderMessage>,
}

impl<S: OptionStore> Plugin<S> {
    /// Build a plugin over `store` with the stock schema and builtin tags.
    pub fn new(store: S) -> Result<Self> {
        Self::with_extensions(store, &[])
    }

    /// Build a plugin whose settings schema passes through the given
    /// extension hooks before it is frozen.
    pub fn with_extensions(store: S, extensions: &[SchemaExtension]) -> Result<Self> {
        let defaults = SettingDefaults::new();
        let schema = SettingsSchema::build_with(&defaults, extensions)?;
        let mut registry = ShortcodeRegistry::default();
        let startup = registry.register_builtins();
        Ok(Self {
            store,
            defaults,
            schema,
            registry,
            startup,
        })
    }

    /// Warnings collected while registering builtin tags. Empty unless a
    /// host claimed one of the tags first.
    pub fn startup_messages(&self) -> &[RenderMessage] {
        &self.startup
    }

    pub fn schema(&self) -> &SettingsSchema {
        &self.schema
    }

    pub fn registry(&self) -> &ShortcodeRegistry {
        &self.registry
    }

    /// Mutable registry access, for hosts adding their own tags.
    pub fn registry_mut(&mut self) -> &mut ShortcodeRegistry {
        &mut self.registry
    }

    /// Settings view over the store with defaults filled in.
    pub fn resolved(&self) -> Resolved<'_> {
        Resolved::new(&self.store, &self.defaults)
    }

    /// Expand shortcodes in `content`, leaving surrounding text as-is.
    pub fn render_content(&self, content: &str) -> RenderOutput {
        render::expand(content, &self.registry, self.resolved())
    }

    /// Expand shortcodes and render the text between them as markdown.
    pub fn render_markdown(&self, content: &str) -> RenderOutput {
        render::expand_markdown(content, &self.registry, self.resolved())
    }

    /// The settings page, with `tab` selecting the visible section.
    pub fn admin_page(&self, tab: Option<&str>) -> String {
        admin::render_settings_page(&self.schema, &self.resolved(), tab)
    }

    /// Head block for pages that contain maps.
    pub fn head_assets(&self, needs_togeojson: bool) -> Result<String> {
        assets::head_assets(&self.resolved(), needs_togeojson)
    }

    /// Resolved value of one setting.
    pub fn setting(&self, id: &str) -> Result<Option<String>> {
        self.resolved().get(id)
    }

    /// Store a setting. The id must exist in the schema.
    pub fn set_option(&mut self, id: &str, value: &str) -> Result<()> {
        if self.schema.field(id).is_none() {
            return Err(LeafpressError::UnknownSetting(id.to_string()));
        }
        self.store.set(&option_key(id), value)
    }

    /// Reset every resettable setting. Returns the ids that were reset.
    pub fn reset_to_defaults(&mut self) -> Result<Vec<&'static str>> {
        store::reset_to_defaults(&mut self.store, &self.schema)
    }

    /// Delete every plugin option. Returns how many keys were removed.
    pub fn purge(&mut self) -> Result<usize> {
        store::purge(&mut self.store)
    }

    /// Record the running version, as an activation hook would.
    pub fn install(&mut self) -> Result<()> {
        store::install(&mut self.store)
    }
}
