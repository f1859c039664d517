//! Slide navigation state machine.
//!
//! [`NavigationState`] is a pure reducer over [`Command`]s. Every transition
//! is total: any valid state and any command produce a valid state, so the
//! session never has to handle a navigation error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An abstract navigation instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Command {
    Next,
    Previous,
    GoTo(usize),
    First,
    Last,
    ToggleNotes,
}

impl Command {
    /// Name used in config files and help output. `GoTo` carries its target
    /// as `go-to:N`.
    pub fn name(&self) -> String {
        match self {
            Self::Next => "next".into(),
            Self::Previous => "previous".into(),
            Self::GoTo(i) => format!("go-to:{i}"),
            Self::First => "first".into(),
            Self::Last => "last".into(),
            Self::ToggleNotes => "toggle-notes".into(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(target) = s.strip_prefix("go-to:") {
            let target: usize = target
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid go-to target: {target}"))?;
            return Ok(Self::GoTo(target));
        }
        match s.as_str() {
            "next" => Ok(Self::Next),
            "previous" | "prev" => Ok(Self::Previous),
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "toggle-notes" | "notes" => Ok(Self::ToggleNotes),
            _ => anyhow::bail!(
                "Unknown command: {s}. Must be 'next', 'previous', 'first', 'last', 'toggle-notes' or 'go-to:N'."
            ),
        }
    }
}

impl TryFrom<String> for Command {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        s.parse()
    }
}

impl From<Command> for String {
    fn from(command: Command) -> Self {
        command.name()
    }
}

/// What Next/Previous do at the ends of the deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryPolicy {
    /// Past the last slide is the first slide, and the other way round.
    Wrap,
    /// Next on the last slide and Previous on the first are no-ops.
    #[default]
    Clamp,
}

impl BoundaryPolicy {
    /// Map a possibly out-of-range position onto `[0, len)`.
    pub fn resolve(self, position: isize, len: usize) -> usize {
        debug_assert!(len > 0);
        let n = len as isize;
        match self {
            Self::Wrap => position.rem_euclid(n) as usize,
            Self::Clamp => position.clamp(0, n - 1) as usize,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Wrap => "wrap",
            Self::Clamp => "clamp",
        }
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoundaryPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "wrap" => Ok(Self::Wrap),
            "clamp" => Ok(Self::Clamp),
            other => anyhow::bail!("Invalid boundary policy: {other}. Must be 'wrap' or 'clamp'."),
        }
    }
}

/// Current slide and notes-panel visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    index: usize,
    notes_visible: bool,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn notes_visible(&self) -> bool {
        self.notes_visible
    }

    /// The state after `command`, for a deck of `len` slides.
    #[must_use]
    pub fn apply(self, command: Command, len: usize, policy: BoundaryPolicy) -> Self {
        let step = |delta: isize| policy.resolve(self.index as isize + delta, len);
        match command {
            Command::Next => Self {
                index: step(1),
                ..self
            },
            Command::Previous => Self {
                index: step(-1),
                ..self
            },
            Command::GoTo(target) if target < len => Self {
                index: target,
                ..self
            },
            Command::GoTo(_) => self,
            Command::First => Self { index: 0, ..self },
            Command::Last => Self {
                index: len - 1,
                ..self
            },
            Command::ToggleNotes => Self {
                notes_visible: !self.notes_visible,
                ..self
            },
        }
    }

    /// Apply `command` in place. Returns whether anything changed.
    pub fn reduce(&mut self, command: Command, len: usize, policy: BoundaryPolicy) -> bool {
        let next = self.apply(command, len, policy);
        let changed = next != *self;
        if changed {
            tracing::debug!(
                %command,
                from = self.index,
                to = next.index,
                notes = next.notes_visible,
                "navigation"
            );
        } else {
            tracing::debug!(%command, index = self.index, len, "navigation no-op");
        }
        *self = next;
        changed
    }

    /// Whether `Next` would move away from the current slide.
    pub fn can_go_next(&self, len: usize, policy: BoundaryPolicy) -> bool {
        self.apply(Command::Next, len, policy).index != self.index
    }

    /// Whether `Previous` would move away from the current slide.
    pub fn can_go_previous(&self, len: usize, policy: BoundaryPolicy) -> bool {
        self.apply(Command::Previous, len, policy).index != self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(len: usize, policy: BoundaryPolicy, commands: &[Command]) -> NavigationState {
        commands
            .iter()
            .fold(NavigationState::new(), |s, &c| s.apply(c, len, policy))
    }

    #[test]
    fn test_initial_state() {
        let s = NavigationState::new();
        assert_eq!(s.index(), 0);
        assert!(!s.notes_visible());
    }

    #[test]
    fn test_wrap_at_both_ends() {
        let at_last = run(5, BoundaryPolicy::Wrap, &[Command::Last]);
        assert_eq!(at_last.index(), 4);
        assert_eq!(at_last.apply(Command::Next, 5, BoundaryPolicy::Wrap).index(), 0);

        let at_first = NavigationState::new();
        assert_eq!(
            at_first
                .apply(Command::Previous, 5, BoundaryPolicy::Wrap)
                .index(),
            4
        );
    }

    #[test]
    fn test_clamp_at_both_ends() {
        let at_last = run(5, BoundaryPolicy::Clamp, &[Command::Last]);
        assert_eq!(at_last.apply(Command::Next, 5, BoundaryPolicy::Clamp), at_last);

        let at_first = NavigationState::new();
        assert_eq!(
            at_first.apply(Command::Previous, 5, BoundaryPolicy::Clamp),
            at_first
        );
    }

    #[test]
    fn test_single_slide_deck() {
        for policy in [BoundaryPolicy::Wrap, BoundaryPolicy::Clamp] {
            let s = run(1, policy, &[Command::Next, Command::Previous, Command::Last]);
            assert_eq!(s.index(), 0);
            assert!(!s.can_go_next(1, policy));
            assert!(!s.can_go_previous(1, policy));
        }
    }

    #[test]
    fn test_goto_out_of_range_is_ignored() {
        let s = run(4, BoundaryPolicy::Clamp, &[Command::GoTo(2)]);
        assert_eq!(s.apply(Command::GoTo(4), 4, BoundaryPolicy::Clamp), s);
        assert_eq!(s.apply(Command::GoTo(usize::MAX), 4, BoundaryPolicy::Wrap), s);
    }

    #[test]
    fn test_toggle_notes_twice_restores() {
        let s = run(3, BoundaryPolicy::Wrap, &[Command::GoTo(1)]);
        let once = s.apply(Command::ToggleNotes, 3, BoundaryPolicy::Wrap);
        assert!(once.notes_visible());
        assert_eq!(once.index(), 1);
        let twice = once.apply(Command::ToggleNotes, 3, BoundaryPolicy::Wrap);
        assert_eq!(twice, s);
    }

    #[test]
    fn test_notes_visibility_survives_navigation() {
        let s = run(
            3,
            BoundaryPolicy::Clamp,
            &[Command::ToggleNotes, Command::Next, Command::Last],
        );
        assert!(s.notes_visible());
        assert_eq!(s.index(), 2);
    }

    #[test]
    fn test_reduce_reports_change() {
        let mut s = NavigationState::new();
        assert!(!s.reduce(Command::Previous, 3, BoundaryPolicy::Clamp));
        assert!(s.reduce(Command::Next, 3, BoundaryPolicy::Clamp));
        assert_eq!(s.index(), 1);
    }

    #[test]
    fn test_can_go_under_each_policy() {
        let s = NavigationState::new();
        assert!(!s.can_go_previous(3, BoundaryPolicy::Clamp));
        assert!(s.can_go_previous(3, BoundaryPolicy::Wrap));
        assert!(s.can_go_next(3, BoundaryPolicy::Clamp));
    }

    #[test]
    fn test_scenario_thirteen_slides_wrap() {
        let p = BoundaryPolicy::Wrap;
        let mut s = NavigationState::new();
        s.reduce(Command::Previous, 13, p);
        assert_eq!(s.index(), 12);
        s.reduce(Command::Next, 13, p);
        assert_eq!(s.index(), 0);
        s.reduce(Command::GoTo(5), 13, p);
        assert_eq!(s.index(), 5);
        s.reduce(Command::ToggleNotes, 13, p);
        assert!(s.notes_visible());
        assert_eq!(s.index(), 5);
    }

    #[test]
    fn test_scenario_twenty_six_slides_clamp() {
        let p = BoundaryPolicy::Clamp;
        let mut s = NavigationState::new();
        s.reduce(Command::Previous, 26, p);
        assert_eq!(s.index(), 0);
        s.reduce(Command::Last, 26, p);
        assert_eq!(s.index(), 25);
        s.reduce(Command::Next, 26, p);
        assert_eq!(s.index(), 25);
    }

    #[test]
    fn test_command_names_parse_back() {
        for c in [
            Command::Next,
            Command::Previous,
            Command::GoTo(7),
            Command::First,
            Command::Last,
            Command::ToggleNotes,
        ] {
            assert_eq!(c.name().parse::<Command>().unwrap(), c);
        }
        assert!("jump".parse::<Command>().is_err());
        assert!("go-to:x".parse::<Command>().is_err());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("wrap".parse::<BoundaryPolicy>().unwrap(), BoundaryPolicy::Wrap);
        assert_eq!(" clamp ".parse::<BoundaryPolicy>().unwrap(), BoundaryPolicy::Clamp);
        assert!("bounce".parse::<BoundaryPolicy>().is_err());
        assert_eq!(BoundaryPolicy::default(), BoundaryPolicy::Clamp);
    }

    fn step() -> impl Strategy<Value = Command> {
        prop_oneof![Just(Command::Next), Just(Command::Previous)]
    }

    fn any_command() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::Next),
            Just(Command::Previous),
            Just(Command::First),
            Just(Command::Last),
            Just(Command::ToggleNotes),
            (0usize..64).prop_map(Command::GoTo),
        ]
    }

    fn policy() -> impl Strategy<Value = BoundaryPolicy> {
        prop_oneof![Just(BoundaryPolicy::Wrap), Just(BoundaryPolicy::Clamp)]
    }

    proptest! {
        #[test]
        fn index_stays_in_range(
            len in 1usize..40,
            policy in policy(),
            commands in proptest::collection::vec(step(), 0..200),
        ) {
            let mut s = NavigationState::new();
            for c in commands {
                s.reduce(c, len, policy);
                prop_assert!(s.index() < len);
            }
        }

        #[test]
        fn any_command_keeps_state_valid(
            len in 1usize..40,
            policy in policy(),
            commands in proptest::collection::vec(any_command(), 0..200),
        ) {
            let s = run(len, policy, &commands);
            prop_assert!(s.index() < len);
        }

        #[test]
        fn goto_in_range_is_exact(
            len in 1usize..40,
            policy in policy(),
            prefix in proptest::collection::vec(any_command(), 0..20),
            seed in any::<usize>(),
        ) {
            let target = seed % len;
            let s = run(len, policy, &prefix).apply(Command::GoTo(target), len, policy);
            prop_assert_eq!(s.index(), target);
        }

        #[test]
        fn goto_out_of_range_never_changes_state(
            len in 1usize..40,
            policy in policy(),
            prefix in proptest::collection::vec(any_command(), 0..20),
            over in 0usize..1000,
        ) {
            let s = run(len, policy, &prefix);
            prop_assert_eq!(s.apply(Command::GoTo(len + over), len, policy), s);
        }

        #[test]
        fn toggle_notes_never_moves(
            len in 1usize..40,
            policy in policy(),
            prefix in proptest::collection::vec(any_command(), 0..20),
        ) {
            let s = run(len, policy, &prefix);
            let t = s.apply(Command::ToggleNotes, len, policy);
            prop_assert_eq!(t.index(), s.index());
            prop_assert_eq!(t.apply(Command::ToggleNotes, len, policy), s);
        }
    }
}
