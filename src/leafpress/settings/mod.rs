//! Settings: the defaults table, the declarative schema, and option storage.
//!
//! The three layers are deliberately separate. [`defaults`] knows what every
//! setting falls back to, [`schema`] knows how settings present as forms, and
//! [`store`] knows how raw values persist. Rendering code only ever sees
//! [`store::Resolved`], which stitches the first and last together.

pub mod defaults;
pub mod schema;
pub mod store;

pub use defaults::SettingDefaults;
pub use schema::{SchemaExtension, SettingsSchema};
pub use store::{FileOptions, MemoryOptions, OptionStore, Resolved};
