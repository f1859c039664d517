pub mod source;

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::nav::Command;

pub use source::{KeyboardSource, Subscription};

/// Commands waiting to be applied, oldest first. Shared between the router
/// callback and whoever drains it.
pub type CommandQueue = Rc<RefCell<VecDeque<Command>>>;

/// Keys the presenter can bind, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    ArrowUp,
    ArrowDown,
    Space,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Escape,
    Char(char),
}

impl Key {
    pub fn name(&self) -> String {
        match self {
            Self::ArrowRight => "arrow-right".into(),
            Self::ArrowLeft => "arrow-left".into(),
            Self::ArrowUp => "arrow-up".into(),
            Self::ArrowDown => "arrow-down".into(),
            Self::Space => "space".into(),
            Self::PageUp => "page-up".into(),
            Self::PageDown => "page-down".into(),
            Self::Home => "home".into(),
            Self::End => "end".into(),
            Self::Enter => "enter".into(),
            Self::Escape => "escape".into(),
            Self::Char(c) => c.to_string(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Key {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let key = match lower.as_str() {
            "arrow-right" | "right" => Self::ArrowRight,
            "arrow-left" | "left" => Self::ArrowLeft,
            "arrow-up" | "up" => Self::ArrowUp,
            "arrow-down" | "down" => Self::ArrowDown,
            "space" => Self::Space,
            "page-up" => Self::PageUp,
            "page-down" => Self::PageDown,
            "home" => Self::Home,
            "end" => Self::End,
            "enter" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphanumeric() => Self::Char(c),
                    _ => anyhow::bail!("Unknown key: {s}"),
                }
            }
        };
        Ok(key)
    }
}

impl TryFrom<String> for Key {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        s.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name()
    }
}

/// One key-down event as delivered by a [`KeyboardSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDown {
    key: Key,
    default_prevented: bool,
}

impl KeyDown {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            default_prevented: false,
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// Claim the key so the window does not run its own handling for it.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Built-in binding sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Bindings {
    /// Arrows, Space, Page Up/Down, Home and End
    #[default]
    Standard,
    /// Left/Right, Space, Home and End only
    Minimal,
}

impl Bindings {
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Minimal => "minimal",
        }
    }
}

impl FromStr for Bindings {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "standard" => Ok(Self::Standard),
            "minimal" => Ok(Self::Minimal),
            other => {
                anyhow::bail!("Invalid bindings: {other}. Must be 'standard' or 'minimal'.")
            }
        }
    }
}

/// The `{key: command}` table consulted by the [`InputRouter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    bindings: BTreeMap<Key, Command>,
}

impl KeyMap {
    pub fn standard() -> Self {
        let mut map = Self::default();
        for key in [Key::ArrowRight, Key::ArrowDown, Key::Space, Key::PageDown] {
            map.bind(key, Command::Next);
        }
        for key in [Key::ArrowLeft, Key::ArrowUp, Key::PageUp] {
            map.bind(key, Command::Previous);
        }
        map.bind(Key::Home, Command::First);
        map.bind(Key::End, Command::Last);
        map
    }

    pub fn minimal() -> Self {
        let mut map = Self::default();
        map.bind(Key::ArrowRight, Command::Next);
        map.bind(Key::Space, Command::Next);
        map.bind(Key::ArrowLeft, Command::Previous);
        map.bind(Key::Home, Command::First);
        map.bind(Key::End, Command::Last);
        map
    }

    pub fn preset(bindings: Bindings) -> Self {
        match bindings {
            Bindings::Standard => Self::standard(),
            Bindings::Minimal => Self::minimal(),
        }
    }

    pub fn bind(&mut self, key: Key, command: Command) {
        self.bindings.insert(key, command);
    }

    pub fn unbind(&mut self, key: Key) -> Option<Command> {
        self.bindings.remove(&key)
    }

    pub fn get(&self, key: Key) -> Option<Command> {
        self.bindings.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Command)> + '_ {
        self.bindings.iter().map(|(k, c)| (*k, *c))
    }

    /// Apply `key: command` overrides from configuration. A value of `none`
    /// removes the binding.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) -> anyhow::Result<()> {
        for (key, value) in overrides {
            let key: Key = key.parse()?;
            if value.trim().eq_ignore_ascii_case("none") {
                self.unbind(key);
            } else {
                self.bind(key, value.parse()?);
            }
        }
        Ok(())
    }
}

/// Turns key-down events into navigation commands.
#[derive(Debug, Clone)]
pub struct InputRouter {
    keymap: KeyMap,
}

impl InputRouter {
    pub fn new(keymap: KeyMap) -> Self {
        Self { keymap }
    }

    /// Look `event` up in the key map. A recognized key is claimed with
    /// `prevent_default` and yields exactly one command; anything else is
    /// left untouched.
    pub fn route(&self, event: &mut KeyDown) -> Option<Command> {
        let command = self.keymap.get(event.key())?;
        event.prevent_default();
        Some(command)
    }

    /// Listen on `source` for as long as the returned subscription lives,
    /// queueing every routed command on `sink`.
    pub fn attach(self, source: &KeyboardSource, sink: CommandQueue) -> Subscription {
        source.subscribe(move |event| {
            if let Some(command) = self.route(event) {
                tracing::trace!(key = %event.key(), %command, "key routed");
                sink.borrow_mut().push_back(command);
            }
        })
    }
}
