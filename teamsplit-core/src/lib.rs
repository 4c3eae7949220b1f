/// teamsplit-core: balance a roster into two teams.
///
/// Roster → partition search → greedy role assignment → balance score → best split.
/// No IO, no network, no filesystem. Bring your own ratings.
///
/// Participants are identified by caller-provided `i64` IDs. In role mode a
/// roster of ten is split five against five and every side covers top, jungle,
/// mid, marksman and support exactly once. Free mode splits any even roster
/// on total rating alone.
///
/// # Quick start
///
/// ```rust
/// use teamsplit_core::{Mode, Participant, PreviousPartition, Role, TeamBuilder};
///
/// let roster: Vec<Participant> = (0..10)
///     .map(|i| Participant::new(i, format!("player{i}"), 800.0 + 250.0 * i as f64))
///     .collect();
///
/// let builder = TeamBuilder::default();
/// let result = builder.build_teams(&roster, Mode::Roles, None).unwrap();
/// println!("blue {:.0} ({}) vs red {:.0} ({})",
///     result.blue.average_rating, result.blue.tier,
///     result.red.average_rating, result.red.tier);
///
/// // Reroll: never the same grouping twice in a row.
/// let previous = PreviousPartition::from_result(&result);
/// let again = builder.build_teams(&roster, Mode::Roles, Some(&previous)).unwrap();
/// assert_ne!(again.blue.ids(), previous.blue_ids);
/// assert!(again.blue.member_with_role(Role::Mid).is_some());
/// ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod manual;
pub mod partition;
pub mod roles;
pub mod scoring;
pub mod session;
pub mod tier;
pub mod types;

// Re-export primary public API at crate root.
pub use engine::{Rejection, TeamBuilder};
pub use error::SplitError;
pub use manual::swap_slots;
pub use partition::{get_effective_strategy, search_partition, Candidate, SearchStrategy};
pub use roles::{assign_roles, satisfies_strict, strict_supply_shortfall};
pub use scoring::{evaluate, ScoreBreakdown};
pub use session::{Session, SessionState};
pub use tier::{parse_rank, rating_to_tier, tier_to_rating, Division, LadderTiers, Tier, TierLabel, TierScale};
pub use types::{
    Mode, Participant, PreviousPartition, Role, RoleSet, ScoreWeights, SearchConfig, Side, Slot, SlotKey, Team,
    TeamResult,
};
