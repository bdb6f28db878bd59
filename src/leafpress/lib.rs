//! # Leafpress Architecture
//!
//! Leafpress is a **host-agnostic shortcode engine** for Leaflet maps. This is not a CLI
//! application that happens to have some library code—it's a library that happens to have
//! a CLI client. Any host that can store key/value options and serve HTML can embed it.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                      │
//! │  - Parses arguments, reads files, formats terminal output   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Facade Layer (plugin.rs)                                   │
//! │  - One `Plugin` over an injected `OptionStore`              │
//! │  - Owns the schema and the shortcode registry               │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Render Layer (render.rs, shortcodes/, style, popup)        │
//! │  - Scans content, dispatches tags, emits HTML and JS        │
//! │  - Pure string-in, string-out business logic                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Settings Layer (settings/)                                 │
//! │  - Abstract `OptionStore` trait                             │
//! │  - FileOptions (production), MemoryOptions (testing)        │
//! │  - Defaults and the schema built over them                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No Host Assumptions in Core
//!
//! From `plugin.rs` inward (facade, render, settings), code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<String>`, [`render::RenderOutput`])
//! - **Never** writes to stdout/stderr
//! - **Never** calls `std::process::exit`
//! - **Never** assumes a particular web host or template system
//!
//! Problems found during rendering never abort the pass. Bad attributes are
//! dropped with a warning collected on the output, so one broken shortcode
//! cannot take a whole page down.
//!
//! ## Map Numbering
//!
//! Rendering is a single pass over one piece of content. Map divs are numbered
//! in document order by per-pass state on the render context, so two passes
//! over the same content produce identical output. Nothing is global.
//!
//! ## Module Overview
//!
//! - [`plugin`]: The `Plugin` facade—entry point for all operations
//! - [`render`]: Content expansion over the shortcode scanner
//! - [`shortcodes`]: Tag registry and the builtin map tags
//! - [`settings`]: Defaults, schema, and option storage
//! - [`style`]: Attribute coercion into Leaflet path options
//! - [`popup`]: Popup binding and its escaping contract
//! - [`liquid`]: `{property | modifier}` template tags for data-driven popups
//! - [`admin`]: Settings page rendering
//! - [`assets`]: Head assets and the client-side bootstrap
//! - [`error`]: Error types

pub mod admin;
pub mod assets;
pub mod error;
pub mod liquid;
pub mod plugin;
pub mod popup;
pub mod render;
pub mod settings;
pub mod shortcodes;
pub mod style;
