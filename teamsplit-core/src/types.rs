use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    BOT_LANE_WEIGHT, EXHAUSTIVE_ROSTER_LIMIT, GOOD_ENOUGH_BOT_DIFF, GOOD_ENOUGH_TOTAL_DIFF,
    MAX_COMBINATIONS_PER_SEARCH, MAX_FREE_ROSTER_SIZE, MAX_REPEATED_ROLES, MAX_SEARCH_ATTEMPTS,
    MIN_CHANGED_MEMBERS, ROLE_ROSTER_SIZE, SOLO_LANE_WEIGHT,
};
use crate::error::SplitError;
use crate::partition::SearchStrategy;
use crate::tier::{TierLabel, TierScale};

/// One of the five positions a role-mode team must cover exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Marksman,
    Support,
}

impl Role {
    /// All roles in canonical order (top, jungle, mid, marksman, support).
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Marksman, Role::Support];

    /// Roles whose matchups are scored individually.
    pub const SOLO_LANES: [Role; 3] = [Role::Top, Role::Jungle, Role::Mid];

    /// Position in canonical order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_bot_lane(self) -> bool {
        matches!(self, Role::Marksman | Role::Support)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Top => "top",
            Role::Jungle => "jungle",
            Role::Mid => "mid",
            Role::Marksman => "marksman",
            Role::Support => "support",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Role::Top),
            "jungle" | "jg" | "jug" | "jgl" => Ok(Role::Jungle),
            "mid" | "middle" => Ok(Role::Mid),
            "marksman" | "adc" | "bot" | "carry" => Ok(Role::Marksman),
            "support" | "sup" | "supp" => Ok(Role::Support),
            other => Err(format!("unknown role \"{other}\"")),
        }
    }
}

/// Unordered set of roles, stored as a 5-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "Vec<Role>", from = "Vec<Role>"))]
pub struct RoleSet(u8);

impl RoleSet {
    const FULL_MASK: u8 = 0b1_1111;

    pub const fn empty() -> Self {
        RoleSet(0)
    }

    pub const fn full() -> Self {
        RoleSet(Self::FULL_MASK)
    }

    pub(crate) fn from_mask(mask: u8) -> Self {
        RoleSet(mask & Self::FULL_MASK)
    }

    pub(crate) fn mask(self) -> u8 {
        self.0
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= 1 << role.index();
    }

    pub fn remove(&mut self, role: Role) {
        self.0 &= !(1 << role.index());
    }

    pub fn contains(self, role: Role) -> bool {
        self.0 & (1 << role.index()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_full(self) -> bool {
        self.0 == Self::FULL_MASK
    }

    pub fn is_subset(self, other: RoleSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Roles in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::empty();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        roles.into_iter().collect()
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_full() {
            return f.write_str("any");
        }
        if self.is_empty() {
            return f.write_str("-");
        }
        let names: Vec<&str> = self.iter().map(Role::as_str).collect();
        f.write_str(&names.join(","))
    }
}

/// A roster entry.
///
/// `rating` is an ordinal skill proxy supplied by the caller (see [`crate::tier`]
/// for the ladder conversion). `assigned_role` is output only: it is `None` on
/// input and set by role assignment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub id: i64,
    pub name: String,
    pub rating: f64,
    #[cfg_attr(feature = "serde", serde(default = "RoleSet::full"))]
    pub preferred_roles: RoleSet,
    /// Treat `preferred_roles` as a hard constraint.
    #[cfg_attr(feature = "serde", serde(default))]
    pub strict: bool,
    /// Kept out of random roster subsets. Has no effect on the split itself.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pinned: bool,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub assigned_role: Option<Role>,
}

impl Participant {
    /// A flexible participant happy to play any role.
    pub fn new(id: i64, name: impl Into<String>, rating: f64) -> Self {
        Participant {
            id,
            name: name.into(),
            rating,
            preferred_roles: RoleSet::full(),
            strict: false,
            pinned: false,
            assigned_role: None,
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.preferred_roles = roles.into_iter().collect();
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    /// Whether the strict flag actually constrains anything.
    ///
    /// An empty or full preference set leaves nothing to enforce, so those
    /// participants are treated as flexible even with `strict` set.
    pub fn is_strict_committed(&self) -> bool {
        self.strict && !self.preferred_roles.is_empty() && !self.preferred_roles.is_full()
    }
}

/// Which balancing mode the roster is split under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Exactly ten players, five roles per side.
    #[default]
    Roles,
    /// Any even roster, no role assignment, scored on total rating only.
    Free,
}

impl Mode {
    pub fn assigns_roles(self) -> bool {
        matches!(self, Mode::Roles)
    }

    /// Human-readable roster requirement, used in error messages.
    pub fn requirement(self) -> String {
        match self {
            Mode::Roles => format!("exactly {ROLE_ROSTER_SIZE} participants"),
            Mode::Free => format!("an even number of participants between 2 and {MAX_FREE_ROSTER_SIZE}"),
        }
    }

    /// Reject rosters the mode cannot split, before any search work starts.
    pub fn validate_roster_size(self, size: usize) -> Result<(), SplitError> {
        let ok = match self {
            Mode::Roles => size == ROLE_ROSTER_SIZE,
            Mode::Free => size >= 2 && size % 2 == 0 && size <= MAX_FREE_ROSTER_SIZE,
        };
        if ok {
            Ok(())
        } else {
            Err(SplitError::InvalidRosterSize { mode: self, actual: size })
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Roles => f.write_str("roles"),
            Mode::Free => f.write_str("free"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roles" | "role" | "5v5" => Ok(Mode::Roles),
            "free" | "roleless" | "role-less" | "aram" => Ok(Mode::Free),
            other => Err(format!("unknown mode \"{other}\". Use \"roles\" or \"free\".")),
        }
    }
}

/// The two sides of a split. Blue is "team A" for anti-repetition purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Blue,
    Red,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Blue => f.write_str("blue"),
            Side::Red => f.write_str("red"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" | "a" => Ok(Side::Blue),
            "red" | "b" => Ok(Side::Red),
            other => Err(format!("unknown side \"{other}\"")),
        }
    }
}

/// One side of a finished split.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team {
    /// In canonical role order when roles are assigned.
    pub members: Vec<Participant>,
    /// Mean member rating.
    pub average_rating: f64,
    pub tier: TierLabel,
}

impl Team {
    pub fn from_members(members: Vec<Participant>, tiers: &dyn TierScale) -> Self {
        let average_rating = mean_rating(&members);
        Team {
            tier: tiers.label(average_rating.round()),
            members,
            average_rating,
        }
    }

    pub fn ids(&self) -> BTreeSet<i64> {
        self.members.iter().map(|p| p.id).collect()
    }

    pub fn member_with_role(&self, role: Role) -> Option<&Participant> {
        self.members.iter().find(|p| p.assigned_role == Some(role))
    }

    pub fn total_rating(&self) -> f64 {
        self.members.iter().map(|p| p.rating).sum()
    }
}

pub(crate) fn mean_rating(members: &[Participant]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    members.iter().map(|p| p.rating).sum::<f64>() / members.len() as f64
}

/// A complete two-team split.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamResult {
    pub blue: Team,
    pub red: Team,
    /// Absolute difference between the two team means.
    pub rating_gap: f64,
}

impl TeamResult {
    pub fn from_sides(blue: Vec<Participant>, red: Vec<Participant>, tiers: &dyn TierScale) -> Self {
        let blue = Team::from_members(blue, tiers);
        let red = Team::from_members(red, tiers);
        TeamResult {
            rating_gap: (blue.average_rating - red.average_rating).abs(),
            blue,
            red,
        }
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }

    /// Recompute means, tiers and gap from current membership.
    pub fn recompute(&mut self, tiers: &dyn TierScale) {
        for side in [Side::Blue, Side::Red] {
            let team = self.team_mut(side);
            team.average_rating = mean_rating(&team.members);
            team.tier = tiers.label(team.average_rating.round());
        }
        self.rating_gap = (self.blue.average_rating - self.red.average_rating).abs();
    }
}

/// What a reroll needs to know about the result it replaces.
///
/// Built from the previous [`TeamResult`] and handed to the next search call.
/// Nothing about it outlives that call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviousPartition {
    pub blue_ids: BTreeSet<i64>,
    pub blue_roles: HashMap<i64, Role>,
}

impl PreviousPartition {
    pub fn from_result(result: &TeamResult) -> Self {
        PreviousPartition {
            blue_ids: result.blue.ids(),
            blue_roles: result
                .blue
                .members
                .iter()
                .filter_map(|p| p.assigned_role.map(|r| (p.id, r)))
                .collect(),
        }
    }

    /// True if `team_ids` is the previous blue side, on either side of the new split.
    pub fn is_repeat(&self, team_a_ids: &BTreeSet<i64>, team_b_ids: &BTreeSet<i64>) -> bool {
        *team_a_ids == self.blue_ids || *team_b_ids == self.blue_ids
    }
}

impl From<&TeamResult> for PreviousPartition {
    fn from(result: &TeamResult) -> Self {
        PreviousPartition::from_result(result)
    }
}

/// How a slot inside a team is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotKey {
    /// The member holding this role (role mode).
    Role(Role),
    /// The member at this position in the team (free mode).
    Seat(usize),
}

/// A (team, position) pair addressed by manual override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    pub side: Side,
    pub key: SlotKey,
}

impl Slot {
    pub fn role(side: Side, role: Role) -> Self {
        Slot { side, key: SlotKey::Role(role) }
    }

    pub fn seat(side: Side, index: usize) -> Self {
        Slot { side, key: SlotKey::Seat(index) }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            SlotKey::Role(role) => write!(f, "{}:{}", self.side, role),
            SlotKey::Seat(index) => write!(f, "{}:{}", self.side, index),
        }
    }
}

impl FromStr for Slot {
    type Err = String;

    /// Parses `blue:top`, `red:jg` or `red:2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, key) = s
            .split_once(':')
            .ok_or_else(|| format!("slot \"{s}\" must look like side:role or side:seat"))?;
        let side: Side = side.parse()?;
        let key = match key.trim().parse::<usize>() {
            Ok(index) => SlotKey::Seat(index),
            Err(_) => SlotKey::Role(key.parse()?),
        };
        Ok(Slot { side, key })
    }
}

/// Weights of the balance score.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoreWeights {
    pub bot_lane: f64,
    pub solo_lane: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            bot_lane: BOT_LANE_WEIGHT,
            solo_lane: SOLO_LANE_WEIGHT,
        }
    }
}

/// Tunables for partition search and the search controller.
///
/// `Default` reproduces the constants in [`crate::constants`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    pub weights: ScoreWeights,
    pub strategy: SearchStrategy,
    pub max_combinations: usize,
    pub max_attempts: usize,
    pub good_enough_total_diff: f64,
    pub good_enough_bot_diff: f64,
    pub max_repeated_roles: usize,
    pub min_changed_members: usize,
    pub exhaustive_roster_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            weights: ScoreWeights::default(),
            strategy: SearchStrategy::Auto,
            max_combinations: MAX_COMBINATIONS_PER_SEARCH,
            max_attempts: MAX_SEARCH_ATTEMPTS,
            good_enough_total_diff: GOOD_ENOUGH_TOTAL_DIFF,
            good_enough_bot_diff: GOOD_ENOUGH_BOT_DIFF,
            max_repeated_roles: MAX_REPEATED_ROLES,
            min_changed_members: MIN_CHANGED_MEMBERS,
            exhaustive_roster_limit: EXHAUSTIVE_ROSTER_LIMIT,
        }
    }
}
