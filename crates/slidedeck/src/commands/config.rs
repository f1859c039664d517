use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = if path.exists() {
        Config::load_from(&path)?
    } else {
        println!("{}", "No config file yet; showing defaults.".yellow());
        Config::default()
    };

    println!("{} {}", "Config file:".bold(), path.display());
    println!();
    println!("{}", describe(&config));
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let path = Config::path()?;
    let mut config = if path.exists() {
        Config::load_from(&path)?
    } else {
        Config::default()
    };
    config.set(key, value)?;
    config.save_to(&path)?;
    tracing::info!(key, value, path = %path.display(), "config updated");
    println!("{} {key} = {value}", "Set".green().bold());
    Ok(())
}

/// Effective settings, with defaults filled in.
fn describe(config: &Config) -> String {
    let mut lines = vec![
        format!(
            "defaults.boundary  {}",
            config.boundary().unwrap_or_default()
        ),
        format!("defaults.bindings  {}", config.bindings().name()),
        format!("defaults.theme     {}", config.theme().unwrap_or("dark")),
    ];
    if config.keys.is_empty() {
        lines.push("keys               (no overrides)".to_string());
    } else {
        for (key, command) in &config.keys {
            lines.push(format!("keys.{key:<14}{command}"));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_defaults() {
        let text = describe(&Config::default());
        assert!(text.contains("defaults.boundary  clamp"));
        assert!(text.contains("defaults.bindings  standard"));
        assert!(text.contains("defaults.theme     dark"));
        assert!(text.contains("(no overrides)"));
    }

    #[test]
    fn test_describe_overrides() {
        let mut config = Config::default();
        config.set("defaults.boundary", "wrap").unwrap();
        config.set("keys.s", "toggle-notes").unwrap();
        let text = describe(&config);
        assert!(text.contains("defaults.boundary  wrap"));
        assert!(text.contains("keys.s"));
        assert!(text.contains("toggle-notes"));
        assert!(!text.contains("(no overrides)"));
    }
}
