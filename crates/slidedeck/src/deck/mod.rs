pub mod parser;
pub mod splitter;

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub use parser::parse;

#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("a deck needs at least one slide")]
    Empty,

    #[error("slide index {index} is out of range for a deck of {len} slides")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
}

/// One deck entry. `content` and `notes` are opaque to navigation; the
/// frontend decides how to draw them.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub title: String,
    pub content: String,
    pub notes: Option<String>,
}

impl Slide {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        self
    }

    pub fn has_notes(&self) -> bool {
        self.notes.is_some()
    }
}

/// Deck-level settings read from a leading YAML block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeckMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub boundary: Option<String>,
}

/// The fixed, ordered slides of one presentation session.
#[derive(Debug, Clone)]
pub struct Deck {
    meta: DeckMeta,
    slides: Vec<Slide>,
}

#[allow(clippy::len_without_is_empty)]
impl Deck {
    pub fn new(slides: Vec<Slide>) -> Result<Self, DeckError> {
        if slides.is_empty() {
            return Err(DeckError::Empty);
        }
        Ok(Self {
            meta: DeckMeta::default(),
            slides,
        })
    }

    pub fn with_meta(meta: DeckMeta, slides: Vec<Slide>) -> Result<Self, DeckError> {
        Ok(Self { meta, ..Self::new(slides)? })
    }

    /// Number of slides. Never zero.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_at(&self, index: usize) -> Result<&Slide, DeckError> {
        self.slides.get(index).ok_or(DeckError::IndexOutOfRange {
            index,
            len: self.slides.len(),
        })
    }

    /// The slide at `index`, or the last slide when `index` is past the end.
    pub fn nearest(&self, index: usize) -> &Slide {
        &self.slides[index.min(self.slides.len() - 1)]
    }

    pub fn slides(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    pub fn meta(&self) -> &DeckMeta {
        &self.meta
    }
}

/// Read and parse a markdown deck from disk.
pub fn load(path: &Path) -> anyhow::Result<Deck> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let deck = parse(&content).with_context(|| format!("Failed to load {}", path.display()))?;
    tracing::info!(path = %path.display(), slides = deck.len(), "deck loaded");
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Deck {
        Deck::new(vec![
            Slide::new("One", "first"),
            Slide::new("Two", "second").with_notes("say hello"),
            Slide::new("Three", "third"),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        assert!(matches!(Deck::new(Vec::new()), Err(DeckError::Empty)));
    }

    #[test]
    fn test_len_and_slide_at() {
        let deck = three();
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.slide_at(1).unwrap().title, "Two");
        assert_eq!(deck.slide_at(2).unwrap().content, "third");
    }

    #[test]
    fn test_slide_at_out_of_range() {
        let deck = three();
        match deck.slide_at(3) {
            Err(DeckError::IndexOutOfRange { index, len }) => {
                assert_eq!(index, 3);
                assert_eq!(len, 3);
            }
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_notes_are_absent() {
        let slide = Slide::new("T", "body").with_notes("   \n");
        assert!(!slide.has_notes());
        let slide = Slide::new("T", "body").with_notes("real notes");
        assert_eq!(slide.notes.as_deref(), Some("real notes"));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("missing.md")).unwrap_err();
        assert!(err.to_string().contains("missing.md"));
    }

    #[test]
    fn test_load_reads_deck_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.md");
        std::fs::write(&path, "# Hello\n\nWorld\n\n# Bye\n\nSee you").unwrap();
        let deck = load(&path).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.slide_at(1).unwrap().title, "Bye");
    }
}
