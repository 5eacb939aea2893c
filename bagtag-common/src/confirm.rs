//! Two-step delete confirmation state machine
//!
//! Destructive deletes require two requests: the first arms a short
//! confirmation window, the second (inside the window) performs the
//! delete. The window disarms itself on expiry, so a late second request
//! behaves as a fresh first request.
//!
//! The clock is passed in by the caller, so the machine is pure and tests
//! never sleep.

use std::time::{Duration, Instant};

/// Length of the confirmation window
pub const CONFIRM_WINDOW: Duration = Duration::from_secs(3);

/// Confirmation state for one displayed record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmState {
    Idle,
    /// Armed until the deadline; a request before the deadline confirms
    Armed { deadline: Instant },
}

/// Outcome of feeding one delete request into the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// First request (or re-arm after expiry); nothing deleted yet
    Armed,
    /// Second request inside the window; perform the delete
    Confirmed,
}

impl ConfirmState {
    pub fn new() -> Self {
        ConfirmState::Idle
    }

    /// Advance the machine on a delete request at time `now`
    ///
    /// Returns the new state and whether the delete should proceed.
    pub fn request(self, now: Instant) -> (ConfirmState, ConfirmOutcome) {
        match self {
            ConfirmState::Armed { deadline } if now <= deadline => {
                (ConfirmState::Idle, ConfirmOutcome::Confirmed)
            }
            // Idle, or armed but expired: (re-)arm a fresh window
            _ => (
                ConfirmState::Armed {
                    deadline: now + CONFIRM_WINDOW,
                },
                ConfirmOutcome::Armed,
            ),
        }
    }

    /// True when armed and the window has not yet expired
    pub fn is_armed(&self, now: Instant) -> bool {
        matches!(self, ConfirmState::Armed { deadline } if now <= *deadline)
    }
}

impl Default for ConfirmState {
    fn default() -> Self {
        ConfirmState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_arms() {
        let now = Instant::now();
        let (state, outcome) = ConfirmState::new().request(now);
        assert_eq!(outcome, ConfirmOutcome::Armed);
        assert!(state.is_armed(now));
    }

    #[test]
    fn second_request_within_window_confirms() {
        let now = Instant::now();
        let (state, _) = ConfirmState::new().request(now);
        let (state, outcome) = state.request(now + Duration::from_secs(1));
        assert_eq!(outcome, ConfirmOutcome::Confirmed);
        assert_eq!(state, ConfirmState::Idle);
    }

    #[test]
    fn request_after_expiry_rearms_instead_of_deleting() {
        let now = Instant::now();
        let (state, _) = ConfirmState::new().request(now);
        let late = now + CONFIRM_WINDOW + Duration::from_millis(1);
        let (state, outcome) = state.request(late);
        assert_eq!(outcome, ConfirmOutcome::Armed);
        assert!(state.is_armed(late));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let now = Instant::now();
        let (state, _) = ConfirmState::new().request(now);
        let (_, outcome) = state.request(now + CONFIRM_WINDOW);
        assert_eq!(outcome, ConfirmOutcome::Confirmed);
    }

    #[test]
    fn armed_state_reports_expiry() {
        let now = Instant::now();
        let (state, _) = ConfirmState::new().request(now);
        assert!(state.is_armed(now + Duration::from_secs(2)));
        assert!(!state.is_armed(now + Duration::from_secs(4)));
    }
}
