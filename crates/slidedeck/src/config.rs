use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::input::{Bindings, Key, KeyMap};
use crate::nav::{BoundaryPolicy, Command};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "slidedeck";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Per-key overrides on top of the binding preset, e.g. `s: toggle-notes`
    /// or `page-down: none`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keys: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<BoundaryPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<Bindings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `slidedeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# slidedeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn boundary(&self) -> Option<BoundaryPolicy> {
        self.defaults.as_ref().and_then(|d| d.boundary)
    }

    pub fn bindings(&self) -> Bindings {
        self.defaults
            .as_ref()
            .and_then(|d| d.bindings)
            .unwrap_or_default()
    }

    pub fn theme(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.theme.as_deref())
    }

    /// The key map for `preset` with this config's `keys` overrides applied.
    pub fn keymap(&self, preset: Bindings) -> Result<KeyMap> {
        let mut map = KeyMap::preset(preset);
        map.apply_overrides(&self.keys)?;
        Ok(map)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.boundary" => {
                let policy: BoundaryPolicy = value.parse()?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .boundary = Some(policy);
            }
            "defaults.bindings" => {
                let bindings: Bindings = value.parse()?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .bindings = Some(bindings);
            }
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            _ => {
                if let Some(name) = key.strip_prefix("keys.") {
                    let parsed: Key = name.parse()?;
                    if !value.eq_ignore_ascii_case("none") {
                        value.parse::<Command>()?;
                    }
                    self.keys.insert(parsed.name(), value.to_ascii_lowercase());
                } else {
                    anyhow::bail!(
                        "Unknown config key: {key}. Valid keys: defaults.boundary, defaults.bindings, defaults.theme, keys.<key>"
                    )
                }
            }
        }
        Ok(())
    }
}
