/// Balance score for a candidate split.
///
/// One function, one weights struct. Pure, no IO, no state.
/// Lower is better; zero means the two sides are indistinguishable on rating.
use crate::types::{Participant, Role, ScoreWeights};

/// The components of a balance score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreBreakdown {
    /// |Σ team1 − Σ team2| over all members.
    pub total_diff: f64,
    /// Same, restricted to marksman and support.
    pub bot_diff: f64,
    /// Worst head-to-head difference among top, jungle and mid.
    pub lane_diff: f64,
    /// `total_diff + bot_lane · bot_diff + solo_lane · lane_diff`.
    pub score: f64,
}

impl ScoreBreakdown {
    /// Whether this split is balanced enough to stop searching.
    pub fn is_good_enough(&self, max_total_diff: f64, max_bot_diff: f64) -> bool {
        self.total_diff <= max_total_diff && self.bot_diff <= max_bot_diff
    }
}

/// Score two role-assigned teams.
///
/// Members without an `assigned_role` only count toward `total_diff`, so a
/// role-less split scores on total rating alone.
pub fn evaluate(team1: &[Participant], team2: &[Participant], weights: &ScoreWeights) -> ScoreBreakdown {
    let total_diff = (rating_sum(team1, |_| true) - rating_sum(team2, |_| true)).abs();

    let is_bot = |p: &Participant| p.assigned_role.is_some_and(Role::is_bot_lane);
    let bot_diff = (rating_sum(team1, is_bot) - rating_sum(team2, is_bot)).abs();

    let mut lane_diff: f64 = 0.0;
    for role in Role::SOLO_LANES {
        let p1 = team1.iter().find(|p| p.assigned_role == Some(role));
        let p2 = team2.iter().find(|p| p.assigned_role == Some(role));
        if let (Some(p1), Some(p2)) = (p1, p2) {
            lane_diff = lane_diff.max((p1.rating - p2.rating).abs());
        }
    }

    ScoreBreakdown {
        total_diff,
        bot_diff,
        lane_diff,
        score: total_diff + weights.bot_lane * bot_diff + weights.solo_lane * lane_diff,
    }
}

fn rating_sum(team: &[Participant], include: impl Fn(&Participant) -> bool) -> f64 {
    team.iter().filter(|p| include(*p)).map(|p| p.rating).sum()
}
