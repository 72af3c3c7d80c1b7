//! Optimistic mutation tracking.
//!
//! A mutation applies its local effect before the backend confirms it.
//! Each one moves through a tiny state machine: `Pending` until the
//! backend answers, then `Committed` on success or `RolledBack` on
//! failure, at which point the prior snapshot is handed back so the caller
//! can restore it. Rendering concerns never touch this type; it only
//! manages snapshots.

/// Lifecycle of one optimistic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Pending,
    Committed,
    RolledBack,
}

/// Holds the pre-mutation snapshot until the mutation settles.
#[derive(Debug)]
pub struct OptimisticMutation<T> {
    prior: T,
    state: MutationState,
}

impl<T> OptimisticMutation<T> {
    /// Starts tracking a mutation, capturing the prior snapshot.
    pub fn begin(prior: T) -> Self {
        Self {
            prior,
            state: MutationState::Pending,
        }
    }

    pub fn state(&self) -> MutationState {
        self.state
    }

    pub fn is_settled(&self) -> bool {
        self.state != MutationState::Pending
    }

    /// Marks the mutation committed. Only a pending mutation can settle;
    /// calling this on a settled one is a no-op.
    pub fn commit(&mut self) {
        if self.state == MutationState::Pending {
            self.state = MutationState::Committed;
        }
    }

    /// Rolls the mutation back and returns the prior snapshot for
    /// restoration. Returns `None` when the mutation already settled.
    pub fn roll_back(&mut self) -> Option<&T> {
        if self.state == MutationState::Pending {
            self.state = MutationState::RolledBack;
            Some(&self.prior)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begins_pending() {
        let m = OptimisticMutation::begin(vec![1, 2, 3]);
        assert_eq!(m.state(), MutationState::Pending);
        assert!(!m.is_settled());
    }

    #[test]
    fn test_commit_settles() {
        let mut m = OptimisticMutation::begin("snapshot");
        m.commit();
        assert_eq!(m.state(), MutationState::Committed);
        // A settled mutation cannot roll back.
        assert!(m.roll_back().is_none());
        assert_eq!(m.state(), MutationState::Committed);
    }

    #[test]
    fn test_roll_back_returns_prior_snapshot() {
        let mut m = OptimisticMutation::begin(vec!["a", "b"]);
        let prior = m.roll_back().expect("pending mutation rolls back");
        assert_eq!(prior, &vec!["a", "b"]);
        assert_eq!(m.state(), MutationState::RolledBack);
    }

    #[test]
    fn test_roll_back_then_commit_is_a_no_op() {
        let mut m = OptimisticMutation::begin(0u32);
        m.roll_back();
        m.commit();
        assert_eq!(m.state(), MutationState::RolledBack);
    }
}
