use crate::deck::Deck;
use crate::nav::{Command, NavigationState};

/// One clickable dot per slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub index: usize,
    pub is_current: bool,
}

impl Marker {
    /// The command a click on this marker issues.
    pub fn select(&self) -> Command {
        Command::GoTo(self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub markers: Vec<Marker>,
    current: usize,
}

impl Progress {
    pub fn project(state: &NavigationState, deck: &Deck) -> Self {
        let current = state.index();
        let markers = (0..deck.len())
            .map(|index| Marker {
                index,
                is_current: index == current,
            })
            .collect();
        Self { markers, current }
    }

    /// Direct selection of slide `index`. Bypasses key routing.
    pub fn select(&self, index: usize) -> Command {
        self.markers
            .get(index)
            .map_or(Command::GoTo(index), Marker::select)
    }

    /// Compact `"current/total"` text.
    pub fn summary(&self) -> String {
        format!("{}/{}", self.current + 1, self.markers.len())
    }

    /// Fraction of the deck already shown, for a progress bar.
    pub fn fraction(&self) -> f32 {
        if self.markers.len() <= 1 {
            1.0
        } else {
            self.current as f32 / (self.markers.len() - 1) as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Slide;
    use crate::nav::BoundaryPolicy;

    fn deck(n: usize) -> Deck {
        Deck::new(
            (0..n)
                .map(|i| Slide::new(format!("S{i}"), "body"))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_one_marker_per_slide() {
        let deck = deck(5);
        let progress = Progress::project(&NavigationState::new(), &deck);
        assert_eq!(progress.markers.len(), 5);
        let current: Vec<usize> = progress
            .markers
            .iter()
            .filter(|m| m.is_current)
            .map(|m| m.index)
            .collect();
        assert_eq!(current, vec![0]);
        assert_eq!(progress.summary(), "1/5");
    }

    #[test]
    fn test_marker_selection_navigates() {
        let deck = deck(13);
        let state = NavigationState::new();
        let progress = Progress::project(&state, &deck);
        let command = progress.markers[7].select();
        assert_eq!(command, Command::GoTo(7));
        assert_eq!(progress.select(7), command);

        let state = state.apply(command, deck.len(), BoundaryPolicy::Wrap);
        let progress = Progress::project(&state, &deck);
        assert!(progress.markers[7].is_current);
        assert_eq!(progress.markers.iter().filter(|m| m.is_current).count(), 1);
        assert_eq!(progress.summary(), "8/13");
    }

    #[test]
    fn test_select_past_the_end_is_a_noop_goto() {
        let deck = deck(3);
        let state = NavigationState::new().apply(Command::GoTo(1), 3, BoundaryPolicy::Clamp);
        let progress = Progress::project(&state, &deck);
        let command = progress.select(9);
        assert_eq!(command, Command::GoTo(9));
        assert_eq!(state.apply(command, deck.len(), BoundaryPolicy::Clamp), state);
    }

    #[test]
    fn test_fraction() {
        let single = deck(1);
        assert_eq!(Progress::project(&NavigationState::new(), &single).fraction(), 1.0);

        let five = deck(5);
        let last = NavigationState::new().apply(Command::Last, 5, BoundaryPolicy::Clamp);
        assert_eq!(Progress::project(&NavigationState::new(), &five).fraction(), 0.0);
        assert_eq!(Progress::project(&last, &five).fraction(), 1.0);
    }
}
