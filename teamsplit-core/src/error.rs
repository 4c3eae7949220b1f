use thiserror::Error;

use crate::types::{Mode, Role, Slot};

/// Everything that can stop a split, a reroll or an override.
///
/// No variant ever carries a partial result: callers get a complete
/// [`crate::TeamResult`] or one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    /// Strict role commitments cannot all be honoured by any split.
    #[error("not enough slots for strict {} players; relax \"strict\" or widen their preferred roles", join_roles(.roles))]
    InfeasibleStrictConstraint { roles: Vec<Role> },

    /// Every attempt, including the unfiltered fallback, came back empty.
    ///
    /// With strict players on the roster this can happen even though
    /// [`crate::roles::strict_supply_shortfall`] found nothing wrong.
    #[error("no balanced split found after {attempts} attempts; if players are marked strict, try widening their preferred roles")]
    SearchExhausted { attempts: usize },

    #[error("{mode} mode needs {}, got {actual}", .mode.requirement())]
    InvalidRosterSize { mode: Mode, actual: usize },

    #[error("participant {id} is already on the roster")]
    DuplicateParticipant { id: i64 },

    #[error("participant {id} is not on the roster")]
    UnknownParticipant { id: i64 },

    #[error("roster is full ({capacity} participants)")]
    RosterFull { capacity: usize },

    #[error("no participant occupies slot {slot}")]
    SlotNotFound { slot: Slot },

    #[error("no teams have been built yet")]
    NotResolved,
}

fn join_roles(roles: &[Role]) -> String {
    roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
}
