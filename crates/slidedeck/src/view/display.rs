use crate::deck::{Deck, Slide};
use crate::nav::NavigationState;

/// Everything the frontend needs to draw the current slide.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel<'a> {
    pub slide: &'a Slide,
    /// Present only while the notes panel is open and the slide has notes.
    pub notes: Option<&'a str>,
    /// `"index+1 / len"`
    pub position: String,
    pub number: usize,
    pub total: usize,
}

impl<'a> DisplayModel<'a> {
    pub fn project(state: &NavigationState, deck: &'a Deck) -> Self {
        let index = state.index().min(deck.len() - 1);
        let slide = deck.nearest(index);
        let notes = if state.notes_visible() {
            slide.notes.as_deref()
        } else {
            None
        };
        Self {
            slide,
            notes,
            position: format!("{} / {}", index + 1, deck.len()),
            number: index + 1,
            total: deck.len(),
        }
    }

    pub fn notes_available(&self) -> bool {
        self.slide.has_notes()
    }
}
