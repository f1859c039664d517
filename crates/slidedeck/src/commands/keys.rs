use std::collections::BTreeMap;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::Config;
use crate::input::{Bindings, Key, KeyMap};

/// Keys handled by the window itself when no binding claims them.
const WINDOW_KEYS: [(Key, &str); 4] = [
    (Key::Char('f'), "toggle fullscreen"),
    (Key::Char('d'), "toggle light/dark theme"),
    (Key::Char('q'), "quit"),
    (Key::Escape, "quit (press twice)"),
];

pub fn run(bindings: Option<Bindings>) -> Result<()> {
    let config = Config::load_or_default();
    let preset = bindings.unwrap_or_else(|| config.bindings());
    let keymap = config
        .keymap(preset)
        .context("Invalid key binding in config")?;

    println!("{} {}", "Bindings:".bold(), preset.name());
    println!();
    for (command, keys) in table(&keymap) {
        println!("  {:<14} {}", command.cyan(), keys.join(", "));
    }
    println!();
    println!("{}", "Window:".bold());
    for (key, action) in WINDOW_KEYS {
        match keymap.get(key) {
            None => println!("  {:<14} {}", key.name().cyan(), action),
            Some(command) => println!(
                "  {:<14} {}",
                key.name().dimmed(),
                format!("{action} (shadowed by {command})").dimmed()
            ),
        }
    }
    Ok(())
}

/// Bound keys grouped by the command they issue.
fn table(keymap: &KeyMap) -> BTreeMap<String, Vec<String>> {
    let mut table: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, command) in keymap.iter() {
        table.entry(command.name()).or_default().push(key.name());
    }
    table
}
