/// Search controller.
///
/// Pure computation, no IO. Runs repeated partition searches and applies the
/// reroll policy to each candidate. Keeps the best survivor, or falls back to
/// an unfiltered search when the policy leaves nothing.
///
/// The previous result is never stored here; callers pass it explicitly.
use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info};

use crate::error::SplitError;
use crate::partition::{search_partition, Candidate};
use crate::tier::{LadderTiers, TierScale};
use crate::types::{Mode, Participant, PreviousPartition, SearchConfig, TeamResult};

/// Why the controller turned down a candidate on reroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Same blue side as last time, or last time's sides swapped.
    SameGrouping,
    /// Too many blue players kept their previous role.
    SameRoles { kept: usize },
    /// Too few new faces on the blue side.
    TooFewChanges { changed: usize },
}

pub struct TeamBuilder {
    config: SearchConfig,
    tiers: Box<dyn TierScale + Send + Sync>,
}

impl Default for TeamBuilder {
    fn default() -> Self {
        TeamBuilder::new(SearchConfig::default())
    }
}

impl TeamBuilder {
    pub fn new(config: SearchConfig) -> Self {
        TeamBuilder {
            config,
            tiers: Box::new(LadderTiers),
        }
    }

    /// Label team means with a different ladder.
    pub fn with_tiers(mut self, tiers: impl TierScale + Send + Sync + 'static) -> Self {
        self.tiers = Box::new(tiers);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn tiers(&self) -> &dyn TierScale {
        self.tiers.as_ref()
    }

    /// Split `roster` into two balanced teams using thread-local randomness.
    ///
    /// Pass the previous result's partition to reroll: the new blue side will
    /// differ from it whenever the roster allows.
    pub fn build_teams(
        &self,
        roster: &[Participant],
        mode: Mode,
        previous: Option<&PreviousPartition>,
    ) -> Result<TeamResult, SplitError> {
        self.build_teams_with_rng(roster, mode, previous, &mut rand::rng())
    }

    /// Same as [`build_teams`](Self::build_teams) with a caller-supplied RNG.
    pub fn build_teams_with_rng(
        &self,
        roster: &[Participant],
        mode: Mode,
        previous: Option<&PreviousPartition>,
        rng: &mut impl Rng,
    ) -> Result<TeamResult, SplitError> {
        mode.validate_roster_size(roster.len())?;
        check_unique_ids(roster)?;

        let max_attempts = self.config.max_attempts;
        let mut best: Option<Candidate> = None;

        for attempt in 0..max_attempts {
            let Some(candidate) = search_partition(roster, mode, previous, &self.config, rng)? else {
                continue;
            };

            if let Some(prev) = previous {
                if let Some(reason) = self.rejection(&candidate, prev) {
                    debug!(attempt, ?reason, "candidate rejected on reroll");
                    continue;
                }
            }

            let good_enough = candidate
                .balance
                .is_good_enough(self.config.good_enough_total_diff, self.config.good_enough_bot_diff);

            if best.as_ref().map_or(true, |b| candidate.balance.score < b.balance.score) {
                best = Some(candidate);
            }

            if good_enough {
                debug!(attempt, "balanced enough, stopping early");
                break;
            }
        }

        let chosen = match best {
            Some(candidate) => candidate,
            None => {
                info!(max_attempts, "reroll filters left no candidate, searching without them");
                search_partition(roster, mode, None, &self.config, rng)?
                    .ok_or(SplitError::SearchExhausted { attempts: max_attempts + 1 })?
            }
        };

        debug!(
            score = chosen.balance.score,
            total_diff = chosen.balance.total_diff,
            bot_diff = chosen.balance.bot_diff,
            lane_diff = chosen.balance.lane_diff,
            "teams built"
        );
        Ok(TeamResult::from_sides(chosen.team_a, chosen.team_b, self.tiers()))
    }

    /// Reroll policy: does `candidate` look too much like the previous result?
    pub fn rejection(&self, candidate: &Candidate, previous: &PreviousPartition) -> Option<Rejection> {
        let team_a_ids = candidate.team_a_ids();
        if previous.is_repeat(&team_a_ids, &candidate.team_b_ids()) {
            return Some(Rejection::SameGrouping);
        }

        let kept = candidate
            .team_a
            .iter()
            .filter(|p| p.assigned_role.is_some() && previous.blue_roles.get(&p.id) == p.assigned_role.as_ref())
            .count();
        if kept >= self.config.max_repeated_roles {
            return Some(Rejection::SameRoles { kept });
        }

        let changed = team_a_ids.difference(&previous.blue_ids).count();
        if changed < self.config.min_changed_members {
            return Some(Rejection::TooFewChanges { changed });
        }

        None
    }
}

fn check_unique_ids(roster: &[Participant]) -> Result<(), SplitError> {
    let mut seen = HashSet::with_capacity(roster.len());
    for p in roster {
        if !seen.insert(p.id) {
            return Err(SplitError::DuplicateParticipant { id: p.id });
        }
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::roles::{satisfies_strict, strict_supply_shortfall};
    use crate::scoring::evaluate;
    use crate::types::{Role, ScoreWeights};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    /// Ten ratings, each player optionally locked to a single role.
    fn role_roster() -> impl Strategy<Value = Vec<Participant>> {
        prop::collection::vec((0.0f64..3600.0, prop::option::of(0..5usize)), 10).prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (rating, strict_role))| {
                    let p = Participant::new(i as i64, format!("p{i}"), rating);
                    match strict_role {
                        Some(r) => p.with_roles([Role::ALL[r]]).strict(),
                        None => p,
                    }
                })
                .collect()
        })
    }

    fn quick_builder() -> TeamBuilder {
        TeamBuilder::new(SearchConfig { max_attempts: 5, ..SearchConfig::default() })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        // Every participant lands on exactly one side, every side covers every role once.
        #[test]
        fn prop_role_split_is_partition_and_bijection(roster in role_roster(), seed in any::<u64>()) {
            prop_assume!(strict_supply_shortfall(&roster).is_empty());
            let mut rng = StdRng::seed_from_u64(seed);
            let result = quick_builder().build_teams_with_rng(&roster, Mode::Roles, None, &mut rng).unwrap();

            let blue = result.blue.ids();
            let red = result.red.ids();
            prop_assert!(blue.is_disjoint(&red));
            let all: BTreeSet<i64> = roster.iter().map(|p| p.id).collect();
            prop_assert_eq!(blue.union(&red).copied().collect::<BTreeSet<_>>(), all);

            for team in [&result.blue, &result.red] {
                let roles: Vec<Role> = team.members.iter().filter_map(|p| p.assigned_role).collect();
                prop_assert_eq!(roles, Role::ALL.to_vec());
                prop_assert!(satisfies_strict(&team.members));
            }
        }

        // Oversubscribed single-role commitments always fail, naming the role.
        #[test]
        fn prop_oversubscribed_role_is_reported(role in 0..5usize, claimants in 3..6usize, seed in any::<u64>()) {
            let role = Role::ALL[role];
            let roster: Vec<Participant> = (0..10)
                .map(|i| {
                    let p = Participant::new(i, format!("p{i}"), 1000.0 + i as f64);
                    if (i as usize) < claimants { p.with_roles([role]).strict() } else { p }
                })
                .collect();
            let mut rng = StdRng::seed_from_u64(seed);
            let err = quick_builder().build_teams_with_rng(&roster, Mode::Roles, None, &mut rng).unwrap_err();
            prop_assert_eq!(err, SplitError::InfeasibleStrictConstraint { roles: vec![role] });
        }

        #[test]
        fn prop_free_split_sides_are_equal(
            ratings in prop::collection::vec(0.0f64..3600.0, 1..9usize).prop_map(|v| [v.clone(), v].concat()),
            seed in any::<u64>(),
        ) {
            let roster: Vec<Participant> = ratings
                .iter()
                .enumerate()
                .map(|(i, &r)| Participant::new(i as i64, format!("p{i}"), r))
                .collect();
            let mut rng = StdRng::seed_from_u64(seed);
            let result = quick_builder().build_teams_with_rng(&roster, Mode::Free, None, &mut rng).unwrap();
            prop_assert_eq!(result.blue.members.len(), roster.len() / 2);
            prop_assert_eq!(result.red.members.len(), roster.len() / 2);
            prop_assert!(result.blue.ids().is_disjoint(&result.red.ids()));
        }

        // The evaluator depends only on the two teams, not on which side is which.
        #[test]
        fn prop_evaluate_is_symmetric(roster in role_roster()) {
            let a = crate::roles::assign_roles(&roster[..5]);
            let b = crate::roles::assign_roles(&roster[5..]);
            let w = ScoreWeights::default();
            prop_assert_eq!(evaluate(&a, &b, &w), evaluate(&b, &a, &w));
        }
    }
}
