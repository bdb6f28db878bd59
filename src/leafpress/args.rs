use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "leafpress")]
#[command(about = "Leaflet map shortcodes for web content", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Options file to read and write (defaults to the platform data dir)
    #[arg(short, long, global = true)]
    pub options: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a content file, expanding shortcodes
    #[command(alias = "r")]
    Render {
        /// File containing [leaflet-map ...] shortcodes
        file: PathBuf,

        /// Render the text between shortcodes as markdown
        #[arg(short, long)]
        markdown: bool,

        /// Prepend the head assets (Leaflet css/js and the bootstrap)
        #[arg(long)]
        full_page: bool,
    },

    /// List settings with their current values
    #[command(alias = "ls")]
    Settings {
        /// Show the shipped defaults instead of stored values
        #[arg(long)]
        defaults: bool,
    },

    /// Store a setting value
    Set {
        /// Setting id (e.g. default_zoom)
        key: String,

        /// Value to store
        value: String,
    },

    /// Reset settings to their defaults (API keys are kept)
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every stored option, including API keys
    Purge {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the settings schema as JSON
    Schema,

    /// Print the settings page HTML
    AdminPage {
        /// Section tab to show (standard, extra)
        #[arg(short, long)]
        tab: Option<String>,
    },
}
