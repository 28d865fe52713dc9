//! Vault lock state machine.
//!
//! Exactly two states, `Locked` and `Unlocked`, with authorized transitions
//! in both directions. The state is process-lifetime only: every restart
//! begins `Locked`. Transitions and the gated write path share one critical
//! section owned by the upload gateway, so a state read used to gate a write
//! can never interleave with a transition.

use chrono::{DateTime, Utc};

use crate::auth::AuthorizedPrincipal;

/// Mutable lock state of the vault. Singleton, owned by the gateway's mutex.
#[derive(Debug, Clone)]
pub struct VaultState {
    locked: bool,
    last_transition_at: DateTime<Utc>,
}

impl VaultState {
    /// Create the initial state: locked, as of now.
    pub fn new() -> Self {
        Self {
            locked: true,
            last_transition_at: Utc::now(),
        }
    }

    /// Whether writes are currently refused.
    pub fn locked(&self) -> bool {
        self.locked
    }

    /// When the lock state last changed (or when the vault started).
    pub fn last_transition_at(&self) -> DateTime<Utc> {
        self.last_transition_at
    }

    /// Transition to the requested state.
    ///
    /// Requires an [`AuthorizedPrincipal`], so only a caller that passed the
    /// auth guard can flip the lock. Setting the current state again is
    /// allowed and still updates the transition timestamp.
    pub fn transition(&mut self, _principal: &AuthorizedPrincipal, locked: bool) {
        self.locked = locked;
        self.last_transition_at = Utc::now();
        tracing::info!(locked, "vault lock state transition");
    }
}

impl Default for VaultState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthGuard;

    fn principal() -> AuthorizedPrincipal {
        AuthGuard::new("test-owner-secret-0123456789abcdef").authorize("test-owner-secret-0123456789abcdef").expect("test secret authorizes")
    }

    #[test]
    fn test_initial_state_is_locked() {
        assert!(VaultState::new().locked());
    }

    #[test]
    fn test_transitions_both_directions() {
        let p = principal();
        let mut state = VaultState::new();

        state.transition(&p, false);
        assert!(!state.locked());

        state.transition(&p, true);
        assert!(state.locked());
    }

    #[test]
    fn test_transition_updates_timestamp() {
        let p = principal();
        let mut state = VaultState::new();
        let before = state.last_transition_at();

        state.transition(&p, false);
        assert!(state.last_transition_at() >= before);
    }
}
