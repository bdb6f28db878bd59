//! # Option Storage
//!
//! This module defines the storage abstraction for plugin options. The
//! [`OptionStore`] trait allows the plugin to work with different backends.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `MemoryOptions` (no filesystem needed)
//! - Allow **host adapters** (a real options table, a key-value service)
//!   without changing rendering logic
//!
//! ## Implementations
//!
//! - [`FileOptions`]: JSON file storage for the CLI
//!   - One flat object in `options.json`, written after every change
//! - [`MemoryOptions`]: in-memory storage for tests and embedding
//!
//! ## Keys and Fallback
//!
//! Every persisted key carries the [`OPTION_PREFIX`], so a purge can find
//! plugin options among unrelated ones. Reads go through [`Resolved`], which
//! applies the defaults table: a missing value falls back to the default, and
//! so does a falsy stored value (`""` or `"0"`), which keeps half-saved forms
//! from blanking out maps.

use crate::error::{LeafpressError, Result};
use crate::settings::defaults::SettingDefaults;
use crate::settings::schema::SettingsSchema;
use crate::style::parse_bool;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix applied to every persisted option key.
pub const OPTION_PREFIX: &str = "wppt_";

/// Option recording the installed plugin version.
pub const VERSION_OPTION: &str = "wppt_version";

/// Storage key for a setting id.
pub fn option_key(id: &str) -> String {
    format!("{}{}", OPTION_PREFIX, id)
}

/// Abstract interface for option storage.
///
/// Implementations persist raw strings; typing and defaults are layered on
/// top by [`Resolved`]. Adapters over fallible backends report failures as
/// [`LeafpressError::Store`].
pub trait OptionStore {
    /// Stored value for a key, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value under a key (create or replace)
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing an absent key is not an error
    fn delete(&mut self, key: &str) -> Result<()>;

    /// All stored keys
    fn keys(&self) -> Vec<String>;
}

/// In-memory storage for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryOptions {
    options: BTreeMap<String, String>,
}

impl MemoryOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OptionStore for MemoryOptions {
    fn get(&self, key: &str) -> Option<String> {
        self.options.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.options.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.options.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.options.keys().cloned().collect()
    }
}

/// File-backed storage. The whole table is one JSON object, rewritten after
/// every mutation.
#[derive(Debug)]
pub struct FileOptions {
    path: PathBuf,
    options: BTreeMap<String, String>,
}

impl FileOptions {
    /// Load options from the given file, or start empty if it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Ok(Self {
                path,
                options: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(LeafpressError::Io)?;
        let options: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(LeafpressError::Serialization)?;
        Ok(Self { path, options })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(LeafpressError::Io)?;
            }
        }

        let content =
            serde_json::to_string_pretty(&self.options).map_err(LeafpressError::Serialization)?;
        fs::write(&self.path, content).map_err(LeafpressError::Io)?;
        Ok(())
    }
}

impl OptionStore for FileOptions {
    fn get(&self, key: &str) -> Option<String> {
        self.options.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.options.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        if self.options.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.options.keys().cloned().collect()
    }
}

fn is_falsy(value: &str) -> bool {
    value.is_empty() || value == "0"
}

/// Read-side view over a store with the defaults table applied.
///
/// Borrowing instead of owning keeps one store shared between reads and the
/// mutating operations ([`reset_to_defaults`], [`purge`]).
pub struct Resolved<'a> {
    store: &'a dyn OptionStore,
    defaults: &'a SettingDefaults,
}

impl<'a> Resolved<'a> {
    pub fn new(store: &'a dyn OptionStore, defaults: &'a SettingDefaults) -> Self {
        Self { store, defaults }
    }

    /// Value for a known setting id. A missing or falsy stored value falls
    /// back to the default; unknown ids are an error.
    pub fn get(&self, id: &str) -> Result<Option<String>> {
        let default = self.defaults.get(id)?;
        match self.store.get(&option_key(id)) {
            Some(value) if !is_falsy(&value) => Ok(Some(value)),
            _ => Ok(default.map(str::to_string)),
        }
    }

    /// Stored value without any fallback. Form rendering uses this to show
    /// exactly what was saved.
    pub fn raw(&self, id: &str) -> Option<String> {
        self.store.get(&option_key(id))
    }

    /// Boolean reading of a setting. Anything unparsable counts as off.
    pub fn flag(&self, id: &str) -> Result<bool> {
        let value = self.get(id)?;
        Ok(value
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(false))
    }

    /// String reading of a setting, empty when nothing applies.
    pub fn text(&self, id: &str) -> Result<String> {
        Ok(self.get(id)?.unwrap_or_default())
    }
}

/// Restore every resettable field to its default by deleting the stored
/// override. Fields marked `noreset` keep their value. Returns the ids that
/// were reset.
pub fn reset_to_defaults(
    store: &mut dyn OptionStore,
    schema: &SettingsSchema,
) -> Result<Vec<&'static str>> {
    let mut reset = Vec::new();
    for section in schema.sections() {
        for field in &section.fields {
            if field.def.noreset {
                continue;
            }
            store.delete(&option_key(field.def.id))?;
            reset.push(field.def.id);
        }
    }
    Ok(reset)
}

/// Remove every plugin option, including the version marker and the fields
/// reset leaves alone. Returns how many keys were deleted.
pub fn purge(store: &mut dyn OptionStore) -> Result<usize> {
    let keys: Vec<String> = store
        .keys()
        .into_iter()
        .filter(|key| key.starts_with(OPTION_PREFIX))
        .collect();
    for key in &keys {
        store.delete(key)?;
    }
    Ok(keys.len())
}

/// Record the running version, as an activation hook would.
pub fn install(store: &mut dyn OptionStore) -> Result<()> {
    store.set(VERSION_OPTION, env!("CARGO_PKG_VERSION"))
}
