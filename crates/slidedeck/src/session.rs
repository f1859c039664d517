use std::rc::Rc;

use crate::deck::Deck;
use crate::input::{CommandQueue, InputRouter, KeyDown, KeyMap, KeyboardSource, Subscription};
use crate::nav::{BoundaryPolicy, Command, NavigationState};
use crate::view::{DisplayModel, Progress};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub policy: BoundaryPolicy,
    pub keymap: KeyMap,
    /// Zero-based slide to open on.
    pub start: Option<usize>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            policy: BoundaryPolicy::default(),
            keymap: KeyMap::standard(),
            start: None,
        }
    }
}

/// One running presentation: the deck, its navigation state and the
/// keyboard subscription that drives it.
///
/// Keyboard events and pointer clicks all become [`Command`]s on a single
/// queue, which is drained in arrival order after every event.
pub struct Session {
    deck: Deck,
    state: NavigationState,
    policy: BoundaryPolicy,
    keyboard: KeyboardSource,
    subscription: Option<Subscription>,
    queue: CommandQueue,
}

impl Session {
    pub fn init(deck: Deck, options: SessionOptions) -> Self {
        let keyboard = KeyboardSource::new();
        let queue = CommandQueue::default();
        let subscription = InputRouter::new(options.keymap).attach(&keyboard, Rc::clone(&queue));

        let mut session = Self {
            deck,
            state: NavigationState::new(),
            policy: options.policy,
            keyboard,
            subscription: Some(subscription),
            queue,
        };
        tracing::info!(
            slides = session.deck.len(),
            policy = %session.policy,
            "presentation session started"
        );

        if let Some(start) = options.start {
            if let Err(err) = session.deck.slide_at(start) {
                tracing::warn!(
                    start = start.saturating_add(1),
                    %err,
                    "start slide out of range, opening on the first slide"
                );
            }
            session.issue(Command::GoTo(start));
        }
        session
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    /// Feed one key-down event from the window. Returns whether the state
    /// changed; the event's `default_prevented` flag tells the caller
    /// whether the key was claimed.
    pub fn key_down(&mut self, event: &mut KeyDown) -> bool {
        self.keyboard.emit(event);
        self.drain()
    }

    /// Marker click: jump straight to `index`.
    pub fn select_marker(&mut self, index: usize) -> bool {
        let command = self.progress().select(index);
        self.issue(command)
    }

    /// Notes button click.
    pub fn toggle_notes(&mut self) -> bool {
        self.issue(Command::ToggleNotes)
    }

    /// Queue a command from a pointer handler and apply it.
    pub fn issue(&mut self, command: Command) -> bool {
        self.queue.borrow_mut().push_back(command);
        self.drain()
    }

    fn drain(&mut self) -> bool {
        let len = self.deck.len();
        let mut changed = false;
        loop {
            let Some(command) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            changed |= self.state.reduce(command, len, self.policy);
        }
        changed
    }

    pub fn display(&self) -> DisplayModel<'_> {
        DisplayModel::project(&self.state, &self.deck)
    }

    pub fn progress(&self) -> Progress {
        Progress::project(&self.state, &self.deck)
    }

    pub fn can_go_next(&self) -> bool {
        self.state.can_go_next(self.deck.len(), self.policy)
    }

    pub fn can_go_previous(&self) -> bool {
        self.state.can_go_previous(self.deck.len(), self.policy)
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Stop listening to the keyboard. The deck and state stay readable,
    /// so a closing window can still paint its last frame.
    pub fn end(&mut self) {
        self.release();
    }

    /// End the session, releasing the keyboard subscription.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.dispose();
            tracing::info!(
                slide = self.state.index() + 1,
                "presentation session ended"
            );
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}
