//! Display-time fallback resolution
//!
//! [`KeyResolver`] walks a candidate list one entry at a time:
//!
//! ```text
//! Idle -> Trying(0) -> Trying(1) -> ... -> Loaded(i) | Exhausted
//! ```
//!
//! It performs no I/O. The caller loads `current()`, then reports the
//! outcome. Every `reset` issues a new [`ResolutionToken`]; outcomes reported
//! with an older token are ignored, so a slow failure for a previous
//! identifier cannot move the state of the current one.

use std::fmt;

/// Resolution state for one displayed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionState {
    /// Not started
    Idle,
    /// Waiting on the load of candidate `i`
    Trying(usize),
    /// Candidate `i` loaded
    Loaded(usize),
    /// Every candidate failed; render the placeholder
    Exhausted,
}

impl ResolutionState {
    /// Check if no further transition is possible without a reset
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Exhausted)
    }
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Trying(i) => write!(f, "trying({i})"),
            Self::Loaded(i) => write!(f, "loaded({i})"),
            Self::Exhausted => f.write_str("exhausted"),
        }
    }
}

/// Result of one load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The image loaded
    Loaded,
    /// The image failed to load
    Failed,
}

/// Identifies one resolution run; changes on every reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolutionToken(u64);

/// What happened to a reported outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reported {
    /// Outcome applied; the new state
    Applied(ResolutionState),
    /// Token was stale; state untouched
    Ignored,
}

/// States reachable from `from` for a list of `candidate_count` entries
#[must_use]
pub fn allowed_transitions(from: ResolutionState, candidate_count: usize) -> Vec<ResolutionState> {
    use ResolutionState::{Exhausted, Idle, Loaded, Trying};
    match from {
        Idle if candidate_count == 0 => vec![Exhausted],
        Idle => vec![Trying(0)],
        Trying(i) if i + 1 < candidate_count => vec![Loaded(i), Trying(i + 1)],
        Trying(i) => vec![Loaded(i), Exhausted],
        Loaded(_) | Exhausted => vec![],
    }
}

/// Validate a state transition
///
/// # Errors
/// Returns error if `to` is not reachable from `from`
pub fn validate_transition(
    from: ResolutionState,
    to: ResolutionState,
    candidate_count: usize,
) -> Result<(), ResolutionError> {
    if allowed_transitions(from, candidate_count).contains(&to) {
        Ok(())
    } else {
        Err(ResolutionError::IllegalTransition { from, to })
    }
}

/// Sequential fallback over an ordered candidate list
#[derive(Debug, Clone)]
pub struct KeyResolver<T> {
    candidates: Vec<T>,
    state: ResolutionState,
    generation: u64,
    attempts: usize,
}

impl<T> KeyResolver<T> {
    /// Create an idle resolver over `candidates`
    #[must_use]
    pub fn new(candidates: Vec<T>) -> Self {
        Self {
            candidates,
            state: ResolutionState::Idle,
            generation: 0,
            attempts: 0,
        }
    }

    /// Replace the candidates (identifier changed) and go back to `Idle`
    ///
    /// Returns the token for the new run.
    pub fn reset(&mut self, candidates: Vec<T>) -> ResolutionToken {
        self.candidates = candidates;
        self.state = ResolutionState::Idle;
        self.generation += 1;
        self.attempts = 0;
        self.token()
    }

    /// Token of the current run
    #[inline]
    #[must_use]
    pub fn token(&self) -> ResolutionToken {
        ResolutionToken(self.generation)
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> ResolutionState {
        self.state
    }

    /// Candidates in priority order
    #[inline]
    #[must_use]
    pub fn candidates(&self) -> &[T] {
        &self.candidates
    }

    /// Number of loads started since the last reset
    #[inline]
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Candidate to load now (`Trying`) or that loaded (`Loaded`)
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        match self.state {
            ResolutionState::Trying(i) | ResolutionState::Loaded(i) => self.candidates.get(i),
            ResolutionState::Idle | ResolutionState::Exhausted => None,
        }
    }

    /// Leave `Idle`: try the first candidate, or exhaust an empty list
    ///
    /// # Errors
    /// Returns error if the resolver was already started
    pub fn start(&mut self) -> Result<ResolutionState, ResolutionError> {
        let next = if self.candidates.is_empty() {
            ResolutionState::Exhausted
        } else {
            ResolutionState::Trying(0)
        };
        self.transition(next)
    }

    /// The current candidate failed; move to the next one or exhaust
    ///
    /// # Errors
    /// Returns error if no load is in flight
    pub fn advance(&mut self) -> Result<ResolutionState, ResolutionError> {
        let ResolutionState::Trying(i) = self.state else {
            return Err(ResolutionError::NotTrying(self.state));
        };
        let next = if i + 1 < self.candidates.len() {
            ResolutionState::Trying(i + 1)
        } else {
            ResolutionState::Exhausted
        };
        self.transition(next)
    }

    /// The current candidate loaded
    ///
    /// # Errors
    /// Returns error if no load is in flight
    pub fn succeed(&mut self) -> Result<ResolutionState, ResolutionError> {
        let ResolutionState::Trying(i) = self.state else {
            return Err(ResolutionError::NotTrying(self.state));
        };
        self.transition(ResolutionState::Loaded(i))
    }

    /// Apply an outcome reported by an asynchronous load
    ///
    /// Outcomes carrying a token from before the last reset are ignored.
    ///
    /// # Errors
    /// Returns error if the token is current but no load is in flight
    pub fn report(
        &mut self,
        token: ResolutionToken,
        outcome: LoadOutcome,
    ) -> Result<Reported, ResolutionError> {
        if token != self.token() {
            tracing::debug!(state = %self.state, "ignoring stale load outcome");
            return Ok(Reported::Ignored);
        }
        let state = match outcome {
            LoadOutcome::Loaded => self.succeed()?,
            LoadOutcome::Failed => self.advance()?,
        };
        Ok(Reported::Applied(state))
    }

    fn transition(&mut self, to: ResolutionState) -> Result<ResolutionState, ResolutionError> {
        validate_transition(self.state, to, self.candidates.len())?;
        if matches!(to, ResolutionState::Trying(_)) {
            self.attempts += 1;
        }
        self.state = to;
        Ok(to)
    }
}

/// Errors from driving a [`KeyResolver`] out of order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Transition not in the state table
    #[error("illegal resolution transition: {from} -> {to}")]
    IllegalTransition {
        from: ResolutionState,
        to: ResolutionState,
    },

    /// Outcome reported while no load was in flight
    #[error("no load in flight (state: {0})")]
    NotTrying(ResolutionState),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_to_third_candidate() {
        let mut resolver = KeyResolver::new(vec!["a", "b", "c"]);
        assert_eq!(resolver.start().unwrap(), ResolutionState::Trying(0));
        assert_eq!(resolver.current(), Some(&"a"));
        assert_eq!(resolver.advance().unwrap(), ResolutionState::Trying(1));
        assert_eq!(resolver.advance().unwrap(), ResolutionState::Trying(2));
        assert_eq!(resolver.succeed().unwrap(), ResolutionState::Loaded(2));
        assert_eq!(resolver.current(), Some(&"c"));
        assert_eq!(resolver.attempts(), 3);
    }

    #[test]
    fn exhausts_after_last_failure() {
        let mut resolver = KeyResolver::new(vec!["only"]);
        resolver.start().unwrap();
        assert_eq!(resolver.advance().unwrap(), ResolutionState::Exhausted);
        assert!(resolver.state().is_terminal());
        assert_eq!(resolver.current(), None);
    }

    #[test]
    fn empty_list_exhausts_immediately() {
        let mut resolver: KeyResolver<String> = KeyResolver::new(vec![]);
        assert_eq!(resolver.start().unwrap(), ResolutionState::Exhausted);
        assert_eq!(resolver.attempts(), 0);
    }

    #[test]
    fn terminal_states_reject_events() {
        let mut resolver = KeyResolver::new(vec!["a"]);
        resolver.start().unwrap();
        resolver.succeed().unwrap();
        assert!(matches!(resolver.advance(), Err(ResolutionError::NotTrying(_))));
        assert!(matches!(
            resolver.start(),
            Err(ResolutionError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn idle_rejects_outcomes() {
        let mut resolver = KeyResolver::new(vec!["a"]);
        assert_eq!(
            resolver.succeed(),
            Err(ResolutionError::NotTrying(ResolutionState::Idle))
        );
    }

    #[test]
    fn reset_restarts_scan() {
        let mut resolver = KeyResolver::new(vec!["a"]);
        resolver.start().unwrap();
        resolver.advance().unwrap();
        resolver.reset(vec!["x", "y"]);
        assert_eq!(resolver.state(), ResolutionState::Idle);
        assert_eq!(resolver.attempts(), 0);
        assert_eq!(resolver.start().unwrap(), ResolutionState::Trying(0));
        assert_eq!(resolver.current(), Some(&"x"));
    }

    #[test]
    fn stale_outcome_is_ignored() {
        let mut resolver = KeyResolver::new(vec!["old-1", "old-2"]);
        let old = resolver.token();
        resolver.start().unwrap();

        let fresh = resolver.reset(vec!["new-1", "new-2"]);
        resolver.start().unwrap();

        assert_eq!(resolver.report(old, LoadOutcome::Failed).unwrap(), Reported::Ignored);
        assert_eq!(resolver.state(), ResolutionState::Trying(0));

        assert_eq!(
            resolver.report(fresh, LoadOutcome::Loaded).unwrap(),
            Reported::Applied(ResolutionState::Loaded(0))
        );
    }

    #[test]
    fn transition_table() {
        use ResolutionState::*;
        assert_eq!(allowed_transitions(Idle, 0), vec![Exhausted]);
        assert_eq!(allowed_transitions(Idle, 2), vec![Trying(0)]);
        assert_eq!(allowed_transitions(Trying(0), 2), vec![Loaded(0), Trying(1)]);
        assert_eq!(allowed_transitions(Trying(1), 2), vec![Loaded(1), Exhausted]);
        assert!(allowed_transitions(Loaded(1), 2).is_empty());
        assert!(allowed_transitions(Exhausted, 2).is_empty());
        assert!(validate_transition(Trying(0), Trying(2), 3).is_err());
    }
}
