/// Partition search: find the best-scoring equal split of a roster.
///
/// One call shuffles the roster once, then walks candidate splits with the
/// effective strategy. Role assignment (role mode only) and the strict-role
/// check run on every candidate; the lowest score wins.
use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::constants::MAX_EXHAUSTIVE_ROSTER_LIMIT;
use crate::error::SplitError;
use crate::roles::{assign_roles, satisfies_strict, strict_supply_shortfall};
use crate::scoring::{evaluate, ScoreBreakdown};
use crate::types::{Mode, Participant, PreviousPartition, ScoreWeights, SearchConfig};

/// How a single partition search walks the space of splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SearchStrategy {
    /// Exhaustive for small rosters, local search above the configured limit.
    #[default]
    Auto,
    /// Every bit pattern with exactly N/2 set bits, up to the combination cap.
    Exhaustive,
    /// Random pairwise swaps between sides, keeping non-worsening moves.
    LocalSearch,
}

/// A scored split. Role-assigned in role mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub team_a: Vec<Participant>,
    pub team_b: Vec<Participant>,
    pub balance: ScoreBreakdown,
}

impl Candidate {
    pub fn team_a_ids(&self) -> BTreeSet<i64> {
        ids(&self.team_a)
    }

    pub fn team_b_ids(&self) -> BTreeSet<i64> {
        ids(&self.team_b)
    }
}

/// Resolve `Auto` and guard the enumeration limit.
///
/// Exhaustive enumeration is exponential in roster size. A roster larger than
/// `exhaustive_limit` always gets local search, even if exhaustive was requested.
pub fn get_effective_strategy(
    requested: SearchStrategy,
    roster_size: usize,
    exhaustive_limit: usize,
) -> SearchStrategy {
    assert!(
        exhaustive_limit <= MAX_EXHAUSTIVE_ROSTER_LIMIT,
        "exhaustive_roster_limit {} exceeds the enumeration ceiling of {}",
        exhaustive_limit,
        MAX_EXHAUSTIVE_ROSTER_LIMIT
    );

    match requested {
        SearchStrategy::LocalSearch => SearchStrategy::LocalSearch,
        SearchStrategy::Auto | SearchStrategy::Exhaustive if roster_size <= exhaustive_limit => {
            SearchStrategy::Exhaustive
        }
        SearchStrategy::Exhaustive => {
            warn!(
                roster_size,
                exhaustive_limit, "roster too large for exhaustive enumeration, using local search"
            );
            SearchStrategy::LocalSearch
        }
        SearchStrategy::Auto => SearchStrategy::LocalSearch,
    }
}

/// Run one partition search.
///
/// Returns `Ok(None)` when no valid split turned up within the combination
/// cap (every candidate was a repeat of `previous` or broke a strict role).
/// Returns `InfeasibleStrictConstraint` when strict commitments rule out
/// every split, without enumerating anything.
pub fn search_partition(
    roster: &[Participant],
    mode: Mode,
    previous: Option<&PreviousPartition>,
    config: &SearchConfig,
    rng: &mut impl Rng,
) -> Result<Option<Candidate>, SplitError> {
    if mode.assigns_roles() {
        let roles = strict_supply_shortfall(roster);
        if !roles.is_empty() {
            warn!(?roles, "strict role commitments cannot be satisfied");
            return Err(SplitError::InfeasibleStrictConstraint { roles });
        }
    }

    let mut shuffled: Vec<&Participant> = roster.iter().collect();
    shuffled.shuffle(rng);

    let strategy = get_effective_strategy(config.strategy, roster.len(), config.exhaustive_roster_limit);
    let best = match strategy {
        SearchStrategy::Exhaustive => exhaustive_search(&shuffled, mode, previous, config),
        SearchStrategy::LocalSearch | SearchStrategy::Auto => {
            local_search(&shuffled, mode, previous, config, rng)
        }
    };

    debug!(
        ?strategy,
        roster_size = roster.len(),
        found = best.is_some(),
        score = ?best.as_ref().map(|c| c.balance.score),
        "partition search finished"
    );
    Ok(best)
}

fn exhaustive_search(
    shuffled: &[&Participant],
    mode: Mode,
    previous: Option<&PreviousPartition>,
    config: &SearchConfig,
) -> Option<Candidate> {
    let n = shuffled.len();
    let team_size = n / 2;
    let mut best: Option<Candidate> = None;
    let mut combinations = 0usize;

    for mask in 0u64..(1u64 << n) {
        if combinations >= config.max_combinations {
            break;
        }
        if mask.count_ones() as usize != team_size {
            continue;
        }
        combinations += 1;

        let mut team_a = Vec::with_capacity(team_size);
        let mut team_b = Vec::with_capacity(n - team_size);
        for (i, p) in shuffled.iter().enumerate() {
            if mask & (1u64 << i) != 0 {
                team_a.push((*p).clone());
            } else {
                team_b.push((*p).clone());
            }
        }

        if let Some(candidate) = try_split(team_a, team_b, mode, previous, &config.weights) {
            keep_better(&mut best, candidate);
        }
    }

    best
}

fn local_search(
    shuffled: &[&Participant],
    mode: Mode,
    previous: Option<&PreviousPartition>,
    config: &SearchConfig,
    rng: &mut impl Rng,
) -> Option<Candidate> {
    if config.max_combinations == 0 {
        return None;
    }

    let team_size = shuffled.len() / 2;
    let mut team_a: Vec<Participant> = shuffled[..team_size].iter().map(|p| (*p).clone()).collect();
    let mut team_b: Vec<Participant> = shuffled[team_size..].iter().map(|p| (*p).clone()).collect();

    let mut best: Option<Candidate> = None;
    let start = try_split(team_a.clone(), team_b.clone(), mode, previous, &config.weights);
    let mut current_score = start.as_ref().map_or(f64::INFINITY, |c| c.balance.score);
    if let Some(candidate) = start {
        keep_better(&mut best, candidate);
    }

    for _ in 1..config.max_combinations {
        let i = rng.random_range(0..team_a.len());
        let j = rng.random_range(0..team_b.len());
        std::mem::swap(&mut team_a[i], &mut team_b[j]);

        let candidate = try_split(team_a.clone(), team_b.clone(), mode, previous, &config.weights);
        let score = candidate.as_ref().map_or(f64::INFINITY, |c| c.balance.score);

        if score <= current_score {
            current_score = score;
            if let Some(candidate) = candidate {
                keep_better(&mut best, candidate);
            }
        } else {
            std::mem::swap(&mut team_a[i], &mut team_b[j]);
        }
    }

    best
}

/// Filter, role-assign and score one split. `None` if it is a repeat or
/// breaks a strict commitment.
fn try_split(
    team_a: Vec<Participant>,
    team_b: Vec<Participant>,
    mode: Mode,
    previous: Option<&PreviousPartition>,
    weights: &ScoreWeights,
) -> Option<Candidate> {
    if let Some(prev) = previous {
        if prev.is_repeat(&ids(&team_a), &ids(&team_b)) {
            return None;
        }
    }

    let (team_a, team_b) = if mode.assigns_roles() {
        let a = assign_roles(&team_a);
        let b = assign_roles(&team_b);
        if !satisfies_strict(&a) || !satisfies_strict(&b) {
            return None;
        }
        (a, b)
    } else {
        (team_a, team_b)
    };

    let balance = evaluate(&team_a, &team_b, weights);
    Some(Candidate { team_a, team_b, balance })
}

fn keep_better(best: &mut Option<Candidate>, candidate: Candidate) {
    if best.as_ref().map_or(true, |b| candidate.balance.score < b.balance.score) {
        *best = Some(candidate);
    }
}

fn ids(team: &[Participant]) -> BTreeSet<i64> {
    team.iter().map(|p| p.id).collect()
}
