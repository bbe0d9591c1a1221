//! # Navigator Session
//!
//! Position state, expiry clocks and the accept/reject rules for navigation
//! events. Pure state: the runtime in `navigator/mod.rs` owns the I/O.

use tokio::time::{Duration, Instant};

use super::controls::{self, ControlId, ControlPair, Direction, NavigatorStyle, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    HardDeadline,
    IdleDeadline,
    UpdateFailed,
    SourceEnded,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::HardDeadline => "hard deadline",
            TerminationReason::IdleDeadline => "idle deadline",
            TerminationReason::UpdateFailed => "update failed",
            TerminationReason::SourceEnded => "event source ended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub hard: Duration,
    pub idle: Duration,
}

/// A navigation request coming from the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEvent<U> {
    pub control: ControlId,
    pub user: U,
}

impl<U> NavEvent<U> {
    pub fn new(control: ControlId, user: U) -> Self {
        Self { control, user }
    }
}

/// Why an event was discarded. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    ForeignUser,
    Terminated,
    ForeignSession,
    StaleControl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Moved { from: usize, to: usize },
    Rejected(Rejection),
}

/// What is currently on screen.
#[derive(Debug, Clone, Copy)]
struct Displayed {
    position: usize,
    generation: u64,
}

#[derive(Debug)]
pub struct Session<U> {
    id: SessionId,
    len: usize,
    position: usize,
    generation: u64,
    owner: U,
    style: NavigatorStyle,
    state: SessionState,
    hard_deadline: Instant,
    idle_timeout: Duration,
    idle_deadline: Instant,
    displayed: Displayed,
}

impl<U: PartialEq> Session<U> {
    pub fn new(len: usize, owner: U, timeouts: Timeouts, style: NavigatorStyle, now: Instant) -> Self {
        debug_assert!(len > 0, "navigator needs at least one item");
        debug_assert!(!timeouts.hard.is_zero() && !timeouts.idle.is_zero());

        Self {
            id: SessionId::new(),
            len,
            position: 0,
            generation: 0,
            owner,
            style,
            state: SessionState::Active,
            hard_deadline: now + timeouts.hard,
            idle_timeout: timeouts.idle,
            idle_deadline: now + timeouts.idle,
            displayed: Displayed {
                position: 0,
                generation: 0,
            },
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn owner(&self) -> &U {
        &self.owner
    }

    #[cfg(test)]
    pub fn idle_deadline(&self) -> Instant {
        self.idle_deadline
    }

    /// Controls for the current render. Fully disabled once terminated.
    pub fn controls(&self) -> ControlPair {
        let pair = controls::render(self.id, self.generation, self.position, self.len, &self.style);
        match self.state {
            SessionState::Active => pair,
            SessionState::Terminated => pair.disabled(),
        }
    }

    /// Whichever deadline comes first. Ties go to the hard deadline.
    pub fn next_expiry(&self) -> (Instant, TerminationReason) {
        if self.idle_deadline < self.hard_deadline {
            (self.idle_deadline, TerminationReason::IdleDeadline)
        } else {
            (self.hard_deadline, TerminationReason::HardDeadline)
        }
    }

    pub fn handle_event(&mut self, event: &NavEvent<U>, now: Instant) -> Verdict {
        if event.user != self.owner {
            return Verdict::Rejected(Rejection::ForeignUser);
        }
        if self.state == SessionState::Terminated {
            return Verdict::Rejected(Rejection::Terminated);
        }
        if event.control.session != self.id {
            return Verdict::Rejected(Rejection::ForeignSession);
        }
        if event.control.generation != self.generation {
            return Verdict::Rejected(Rejection::StaleControl);
        }

        let from = self.position;
        self.position = match event.control.direction {
            Direction::Previous => from.saturating_sub(1),
            Direction::Next => (from + 1).min(self.len - 1),
        };
        self.idle_deadline = now + self.idle_timeout;
        self.generation += 1;

        Verdict::Moved {
            from,
            to: self.position,
        }
    }

    /// Marks the current render as shown to the user.
    pub fn commit(&mut self) {
        self.displayed = Displayed {
            position: self.position,
            generation: self.generation,
        };
    }

    /// Returns to the last render the user actually saw.
    pub fn rollback(&mut self) {
        if self.state == SessionState::Active {
            self.position = self.displayed.position;
            self.generation = self.displayed.generation;
        }
    }

    /// Returns the sealed control pair on the first call only.
    pub fn terminate(&mut self) -> Option<ControlPair> {
        if self.state == SessionState::Terminated {
            return None;
        }
        self.state = SessionState::Terminated;
        self.generation += 1;
        Some(self.controls())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARD: Duration = Duration::from_secs(300);
    const IDLE: Duration = Duration::from_secs(60);

    fn session(len: usize, now: Instant) -> Session<&'static str> {
        Session::new(
            len,
            "u1",
            Timeouts {
                hard: HARD,
                idle: IDLE,
            },
            NavigatorStyle::default(),
            now,
        )
    }

    fn press(s: &Session<&'static str>, direction: Direction, user: &'static str) -> NavEvent<&'static str> {
        NavEvent::new(s.controls().get(direction).id, user)
    }

    fn step(s: &mut Session<&'static str>, direction: Direction, user: &'static str, now: Instant) -> Verdict {
        let event = press(s, direction, user);
        let verdict = s.handle_event(&event, now);
        s.commit();
        verdict
    }

    #[test]
    fn test_walkthrough_three_items() {
        let now = Instant::now();
        let mut s = session(3, now);

        assert_eq!(s.position(), 0);
        assert!(s.controls().previous.disabled);
        assert!(!s.controls().next.disabled);

        assert_eq!(step(&mut s, Direction::Next, "u1", now), Verdict::Moved { from: 0, to: 1 });
        assert!(!s.controls().previous.disabled);
        assert!(!s.controls().next.disabled);

        assert_eq!(
            step(&mut s, Direction::Next, "u2", now),
            Verdict::Rejected(Rejection::ForeignUser)
        );
        assert_eq!(s.position(), 1);

        assert_eq!(step(&mut s, Direction::Next, "u1", now), Verdict::Moved { from: 1, to: 2 });
        assert!(s.controls().next.disabled);

        assert_eq!(step(&mut s, Direction::Next, "u1", now), Verdict::Moved { from: 2, to: 2 });
        assert_eq!(s.position(), 2);
    }

    #[test]
    fn test_previous_clamps_at_zero() {
        let now = Instant::now();
        let mut s = session(3, now);
        assert_eq!(step(&mut s, Direction::Previous, "u1", now), Verdict::Moved { from: 0, to: 0 });
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn test_position_stays_in_bounds() {
        let now = Instant::now();
        let mut s = session(4, now);
        let script = [
            Direction::Next,
            Direction::Next,
            Direction::Previous,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Previous,
            Direction::Previous,
            Direction::Previous,
            Direction::Previous,
            Direction::Previous,
        ];
        for direction in script {
            step(&mut s, direction, "u1", now);
            assert!(s.position() < s.len());
            let pair = s.controls();
            assert_eq!(pair.previous.disabled, s.position() == 0);
            assert_eq!(pair.next.disabled, s.position() == s.len() - 1);
        }
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn test_foreign_user_does_not_reset_idle() {
        let start = Instant::now();
        let mut s = session(3, start);
        let later = start + Duration::from_secs(30);

        step(&mut s, Direction::Next, "intruder", later);
        assert_eq!(s.idle_deadline(), start + IDLE);

        step(&mut s, Direction::Next, "u1", later);
        assert_eq!(s.idle_deadline(), later + IDLE);
    }

    #[test]
    fn test_stale_and_foreign_controls_rejected() {
        let now = Instant::now();
        let mut s = session(3, now);
        let stale = press(&s, Direction::Next, "u1");
        step(&mut s, Direction::Next, "u1", now);

        assert_eq!(s.handle_event(&stale, now), Verdict::Rejected(Rejection::StaleControl));

        let other = session(3, now);
        let foreign = press(&other, Direction::Next, "u1");
        assert_eq!(s.handle_event(&foreign, now), Verdict::Rejected(Rejection::ForeignSession));
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn test_single_item_both_disabled() {
        let s = session(1, Instant::now());
        assert!(s.controls().all_disabled());
    }

    #[test]
    fn test_terminate_is_idempotent() {
        let now = Instant::now();
        let mut s = session(3, now);
        step(&mut s, Direction::Next, "u1", now);

        let sealed = s.terminate().expect("first terminate seals");
        assert!(sealed.all_disabled());
        assert!(s.terminate().is_none());
        assert_eq!(s.state(), SessionState::Terminated);
        assert!(s.controls().all_disabled());
    }

    #[test]
    fn test_events_after_termination_ignored() {
        let now = Instant::now();
        let mut s = session(3, now);
        s.terminate();
        let event = press(&s, Direction::Next, "u1");
        assert_eq!(s.handle_event(&event, now), Verdict::Rejected(Rejection::Terminated));
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn test_rollback_restores_displayed_render() {
        let now = Instant::now();
        let mut s = session(3, now);
        step(&mut s, Direction::Next, "u1", now);
        let shown = s.controls();

        let event = press(&s, Direction::Next, "u1");
        s.handle_event(&event, now);
        assert_eq!(s.position(), 2);
        s.rollback();

        assert_eq!(s.position(), 1);
        assert_eq!(s.controls(), shown);
    }

    #[test]
    fn test_next_expiry_picks_earliest() {
        let start = Instant::now();
        let s = session(3, start);
        assert_eq!(s.next_expiry(), (start + IDLE, TerminationReason::IdleDeadline));

        let mut s = session(3, start);
        let late = start + HARD - Duration::from_secs(10);
        step(&mut s, Direction::Next, "u1", late);
        assert_eq!(s.next_expiry(), (start + HARD, TerminationReason::HardDeadline));
    }
}
