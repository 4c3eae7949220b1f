/// Greedy role assignment for a five-player side.
///
/// Most-constrained-first: strict players go before flexible ones, and within
/// each group players with fewer preferred roles pick first. The assigner never
/// fails; a strict player left without a preferred role gets whatever is free,
/// and the caller rejects that side with [`satisfies_strict`].
use crate::constants::SIDES;
use crate::types::{Participant, Role, RoleSet};

/// Assign every role to exactly one member of `group`.
///
/// Returns the members in canonical role order with `assigned_role` set.
/// `group` is expected to hold one player per role.
pub fn assign_roles(group: &[Participant]) -> Vec<Participant> {
    debug_assert!(group.len() <= Role::ALL.len(), "a side holds at most one player per role");

    let mut available: Vec<Role> = Role::ALL.to_vec();

    let (mut strict, mut flexible): (Vec<&Participant>, Vec<&Participant>) =
        group.iter().partition(|p| p.is_strict_committed());
    strict.sort_by_key(|p| p.preferred_roles.len());
    flexible.sort_by_key(|p| p.preferred_roles.len());

    let mut assigned: Vec<Participant> = Vec::with_capacity(group.len());
    for player in strict.into_iter().chain(flexible) {
        let role = take_role(&mut available, player.preferred_roles);
        let mut player = player.clone();
        player.assigned_role = role;
        assigned.push(player);
    }

    assigned.sort_by_key(|p| p.assigned_role.map(Role::index));
    assigned
}

/// First free role the player prefers, else the first free role at all.
fn take_role(available: &mut Vec<Role>, preferred: RoleSet) -> Option<Role> {
    if available.is_empty() {
        return None;
    }
    let pos = available.iter().position(|r| preferred.contains(*r)).unwrap_or(0);
    Some(available.remove(pos))
}

/// Every strict player on `team` holds one of their preferred roles.
pub fn satisfies_strict(team: &[Participant]) -> bool {
    team.iter().all(|p| {
        !p.is_strict_committed()
            || p.assigned_role.is_some_and(|r| p.preferred_roles.contains(r))
    })
}

/// Roles whose slots cannot cover the strict players who depend on them.
///
/// Each role has one slot per side. For every set of roles S, the strict
/// players whose preferences lie entirely inside S need at least as many
/// slots as S provides across both sides. Each minimal S that fails
/// contributes its roles to the result. An empty result means the commitments are not ruled
/// out structurally.
///
/// Passing this check is necessary but not sufficient. [`assign_roles`] is
/// greedy and can strand a strict player on some rosters that do have a
/// valid assignment, in which case the search ends in
/// [`SplitError::SearchExhausted`](crate::SplitError::SearchExhausted).
pub fn strict_supply_shortfall(roster: &[Participant]) -> Vec<Role> {
    let committed: Vec<RoleSet> = roster
        .iter()
        .filter(|p| p.is_strict_committed())
        .map(|p| p.preferred_roles)
        .collect();
    if committed.is_empty() {
        return Vec::new();
    }

    let violated: Vec<RoleSet> = (1u8..(1 << Role::ALL.len()))
        .map(RoleSet::from_mask)
        .filter(|subset| {
            let demand = committed.iter().filter(|prefs| prefs.is_subset(*subset)).count();
            demand > subset.len() * SIDES
        })
        .collect();

    // A violated set drags every superset along; report only the minimal ones.
    let mut short = RoleSet::empty();
    for subset in &violated {
        let minimal = !violated.iter().any(|other| other != subset && other.is_subset(*subset));
        if minimal {
            short = RoleSet::from_mask(short.mask() | subset.mask());
        }
    }
    short.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn flexible(id: i64) -> Participant {
        Participant::new(id, format!("p{id}"), 1000.0 + id as f64)
    }

    fn strict(id: i64, roles: &[Role]) -> Participant {
        Participant::new(id, format!("s{id}"), 1000.0).with_roles(roles.iter().copied()).strict()
    }

    fn roles_of(team: &[Participant]) -> Vec<Role> {
        team.iter().map(|p| p.assigned_role.unwrap()).collect()
    }

    #[test]
    fn test_all_flexible_get_canonical_roles() {
        let group: Vec<Participant> = (0..5).map(flexible).collect();
        let team = assign_roles(&group);
        assert_eq!(roles_of(&team), Role::ALL.to_vec());
        // Stable sort: input order decides who gets which role.
        let ids: Vec<i64> = team.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_strict_player_picks_before_flexible() {
        let group = vec![
            flexible(0).with_roles([Role::Support]),
            flexible(1),
            flexible(2),
            flexible(3),
            strict(4, &[Role::Support]),
        ];
        let team = assign_roles(&group);

        let support = team.iter().find(|p| p.assigned_role == Some(Role::Support)).unwrap();
        assert_eq!(support.id, 4, "strict player claims support before the soft preference");
        let soft = team.iter().find(|p| p.id == 0).unwrap();
        assert_eq!(soft.assigned_role, Some(Role::Top), "soft preference falls back to first free role");
        assert!(satisfies_strict(&team));
    }

    #[test]
    fn test_fewest_options_first() {
        let group = vec![
            strict(0, &[Role::Top, Role::Mid]),
            strict(1, &[Role::Top]),
            flexible(2),
            flexible(3),
            flexible(4),
        ];
        let team = assign_roles(&group);
        let by_id = |id| team.iter().find(|p| p.id == id).unwrap().assigned_role;
        assert_eq!(by_id(1), Some(Role::Top));
        assert_eq!(by_id(0), Some(Role::Mid));
    }

    #[test]
    fn test_output_is_a_bijection() {
        let group = vec![
            strict(0, &[Role::Jungle]),
            flexible(1).with_roles([Role::Jungle]),
            flexible(2).with_roles([Role::Marksman, Role::Support]),
            flexible(3).with_roles([]),
            strict(4, &[Role::Mid, Role::Top]),
        ];
        let team = assign_roles(&group);
        let roles: HashSet<Role> = team.iter().filter_map(|p| p.assigned_role).collect();
        assert_eq!(roles.len(), 5);
        assert_eq!(roles_of(&team), Role::ALL.to_vec());
    }

    #[test]
    fn test_conflicting_strict_players_are_flagged() {
        let group = vec![
            strict(0, &[Role::Mid]),
            strict(1, &[Role::Mid]),
            flexible(2),
            flexible(3),
            flexible(4),
        ];
        let team = assign_roles(&group);
        assert_eq!(roles_of(&team).len(), 5);
        assert!(!satisfies_strict(&team));
    }

    #[test]
    fn test_strict_flag_without_real_constraint_is_flexible() {
        let mut empty = flexible(0).with_roles([]);
        empty.strict = true;
        let group = vec![empty, flexible(1), flexible(2), flexible(3), flexible(4)];
        let team = assign_roles(&group);
        assert!(satisfies_strict(&team));
    }

    #[test]
    fn test_shortfall_names_oversubscribed_role() {
        let mut roster: Vec<Participant> = (0..3).map(|i| strict(i, &[Role::Mid])).collect();
        roster.extend((3..10).map(flexible));
        assert_eq!(strict_supply_shortfall(&roster), vec![Role::Mid]);
    }

    #[test]
    fn test_shortfall_ignores_supersets_of_a_failing_role() {
        let mut roster: Vec<Participant> = (0..5).map(|i| strict(i, &[Role::Mid])).collect();
        roster.extend((5..10).map(flexible));
        assert_eq!(strict_supply_shortfall(&roster), vec![Role::Mid]);
    }

    #[test]
    fn test_shortfall_empty_when_feasible() {
        let mut roster: Vec<Participant> = (0..2).map(|i| strict(i, &[Role::Mid])).collect();
        roster.extend((2..10).map(flexible));
        assert!(strict_supply_shortfall(&roster).is_empty());
        assert!(strict_supply_shortfall(&(0..10).map(flexible).collect::<Vec<_>>()).is_empty());
    }

    #[test]
    fn test_shortfall_across_role_groups() {
        // Five players squeezed into top/jungle: four slots for five players.
        let mut roster = vec![
            strict(0, &[Role::Top]),
            strict(1, &[Role::Top, Role::Jungle]),
            strict(2, &[Role::Jungle]),
            strict(3, &[Role::Top, Role::Jungle]),
            strict(4, &[Role::Jungle, Role::Top]),
        ];
        roster.extend((5..10).map(flexible));
        assert_eq!(strict_supply_shortfall(&roster), vec![Role::Top, Role::Jungle]);
    }
}
