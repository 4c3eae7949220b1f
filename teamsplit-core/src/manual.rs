/// Manual override of a finished split.
///
/// Exchanges the occupants of two slots. A slot keeps its role; only the
/// player in it changes. Team stats are recomputed from the new membership,
/// never adjusted incrementally. Strict preferences are not re-checked: a
/// manual swap is allowed to break them.
use tracing::debug;

use crate::error::SplitError;
use crate::tier::TierScale;
use crate::types::{Participant, Slot, SlotKey, TeamResult};

/// Swap the occupants of `a` and `b`, then recompute both teams.
///
/// Swapping a slot with itself is a no-op.
pub fn swap_slots(
    result: &mut TeamResult,
    a: Slot,
    b: Slot,
    tiers: &dyn TierScale,
) -> Result<(), SplitError> {
    let i = resolve(result, a)?;
    let j = resolve(result, b)?;
    if a.side == b.side && i == j {
        return Ok(());
    }

    if a.side == b.side {
        let members = &mut result.team_mut(a.side).members;
        let (role_i, role_j) = (members[i].assigned_role, members[j].assigned_role);
        members.swap(i, j);
        members[i].assigned_role = role_i;
        members[j].assigned_role = role_j;
    } else {
        let incoming_to_a = take(result, b, j);
        let incoming_to_b = take(result, a, i);
        place(result, a, i, incoming_to_a);
        place(result, b, j, incoming_to_b);
    }

    result.recompute(tiers);
    debug!(%a, %b, rating_gap = result.rating_gap, "slots swapped");
    Ok(())
}

/// Index of the member occupying `slot`.
fn resolve(result: &TeamResult, slot: Slot) -> Result<usize, SplitError> {
    let members = &result.team(slot.side).members;
    let found = match slot.key {
        SlotKey::Role(role) => members.iter().position(|p| p.assigned_role == Some(role)),
        SlotKey::Seat(index) => (index < members.len()).then_some(index),
    };
    found.ok_or(SplitError::SlotNotFound { slot })
}

fn take(result: &TeamResult, slot: Slot, index: usize) -> Participant {
    result.team(slot.side).members[index].clone()
}

/// Put `player` into the slot, keeping the slot's role.
fn place(result: &mut TeamResult, slot: Slot, index: usize, mut player: Participant) {
    let seat = &mut result.team_mut(slot.side).members[index];
    player.assigned_role = seat.assigned_role;
    *seat = player;
}
