use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use leafpress::error::{LeafpressError, Result};
use leafpress::plugin::Plugin;
use leafpress::render::{MessageLevel, RenderMessage};
use leafpress::settings::store::FileOptions;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut plugin = init_plugin(&cli)?;
    print_messages(plugin.startup_messages());

    match cli.command {
        Some(Commands::Render {
            file,
            markdown,
            full_page,
        }) => handle_render(&plugin, file, markdown, full_page),
        Some(Commands::Settings { defaults }) => handle_settings(&plugin, defaults),
        Some(Commands::Set { key, value }) => handle_set(&mut plugin, key, value),
        Some(Commands::Reset { yes }) => handle_reset(&mut plugin, yes),
        Some(Commands::Purge { yes }) => handle_purge(&mut plugin, yes),
        Some(Commands::Schema) => handle_schema(&plugin),
        Some(Commands::AdminPage { tab }) => handle_admin_page(&plugin, tab),
        None => handle_settings(&plugin, false),
    }
}

fn init_plugin(cli: &Cli) -> Result<Plugin<FileOptions>> {
    let path = match &cli.options {
        Some(path) => path.clone(),
        None => {
            let proj_dirs = ProjectDirs::from("com", "leafpress", "leafpress")
                .expect("Could not determine data dir");
            proj_dirs.data_dir().join("options.json")
        }
    };
    let store = FileOptions::load(path)?;
    Plugin::new(store)
}

fn handle_render(
    plugin: &Plugin<FileOptions>,
    file: PathBuf,
    markdown: bool,
    full_page: bool,
) -> Result<()> {
    let content = fs::read_to_string(&file).map_err(LeafpressError::Io)?;
    let output = if markdown {
        plugin.render_markdown(&content)
    } else {
        plugin.render_content(&content)
    };

    if full_page {
        print!("{}", plugin.head_assets(output.needs_togeojson)?);
    }
    print!("{}", output.html);
    print_messages(&output.messages);
    Ok(())
}

const VALUE_WIDTH: usize = 60;

fn handle_settings(plugin: &Plugin<FileOptions>, defaults: bool) -> Result<()> {
    let resolved = plugin.resolved();
    for section in plugin.schema().sections() {
        println!("{}", section.title.bold());

        let rows: Vec<(&str, String)> = section
            .fields
            .iter()
            .map(|field| {
                let value = if defaults {
                    field.default.clone()
                } else {
                    resolved
                        .raw(field.def.id)
                        .unwrap_or_else(|| field.default.clone())
                };
                (field.def.id, value)
            })
            .collect();

        let id_width = rows.iter().map(|(id, _)| id.width()).max().unwrap_or(0);
        for (id, value) in &rows {
            let padding = id_width.saturating_sub(id.width());
            let flattened: String = value
                .chars()
                .map(|c| if c == '\n' { ' ' } else { c })
                .collect();
            println!(
                "  {}{}  {}",
                id,
                " ".repeat(padding),
                truncate_to_width(&flattened, VALUE_WIDTH).dimmed()
            );
        }
        println!();
    }
    Ok(())
}

fn handle_set(plugin: &mut Plugin<FileOptions>, key: String, value: String) -> Result<()> {
    plugin.set_option(&key, &value)?;
    println!("{}", format!("{} = {}", key, value).green());
    Ok(())
}

fn handle_reset(plugin: &mut Plugin<FileOptions>, yes: bool) -> Result<()> {
    if !yes {
        println!("This resets every setting except the API keys. Pass --yes to confirm.");
        return Ok(());
    }
    let reset = plugin.reset_to_defaults()?;
    println!(
        "{}",
        format!("Reset {} settings to their defaults.", reset.len()).green()
    );
    Ok(())
}

fn handle_purge(plugin: &mut Plugin<FileOptions>, yes: bool) -> Result<()> {
    if !yes {
        println!("This deletes every stored option, including API keys. Pass --yes to confirm.");
        return Ok(());
    }
    let removed = plugin.purge()?;
    println!("{}", format!("Removed {} stored options.", removed).green());
    Ok(())
}

fn handle_schema(plugin: &Plugin<FileOptions>) -> Result<()> {
    let json = serde_json::to_string_pretty(plugin.schema().sections())
        .map_err(LeafpressError::Serialization)?;
    println!("{}", json);
    Ok(())
}

fn handle_admin_page(plugin: &Plugin<FileOptions>, tab: Option<String>) -> Result<()> {
    print!("{}", plugin.admin_page(tab.as_deref()));
    Ok(())
}

// Messages go to stderr so rendered HTML stays pipeable.
fn print_messages(messages: &[RenderMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => eprintln!("{}", message.text.dimmed()),
            MessageLevel::Success => eprintln!("{}", message.text.green()),
            MessageLevel::Warning => eprintln!("{}", message.text.yellow()),
            MessageLevel::Error => eprintln!("{}", message.text.red()),
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
