/// Weight applied to the bottom-lane (marksman + support) rating difference.
///
/// Bottom lane is a two-player pairing, so an imbalance there tends to snowball
/// harder than an equal imbalance spread over the whole team.
pub const BOT_LANE_WEIGHT: f64 = 1.5;

/// Weight applied to the worst solo-lane (top, jungle, mid) matchup difference.
pub const SOLO_LANE_WEIGHT: f64 = 0.5;

/// Maximum number of team-size combinations a single partition search inspects.
///
/// For a 10-player roster there are only C(10,5) = 252 bit patterns, so the cap
/// never bites. It exists so a larger free-mode roster cannot turn one search
/// call into an exponential walk.
pub const MAX_COMBINATIONS_PER_SEARCH: usize = 5000;

/// Number of partition searches the controller runs per build or reroll.
/// Each search starts from a fresh shuffle of the roster.
pub const MAX_SEARCH_ATTEMPTS: usize = 100;

/// A candidate whose total rating difference is at or below this value is
/// considered balanced enough to stop searching (together with the bot-lane bound).
pub const GOOD_ENOUGH_TOTAL_DIFF: f64 = 50.0;

/// Bot-lane bound paired with [`GOOD_ENOUGH_TOTAL_DIFF`].
pub const GOOD_ENOUGH_BOT_DIFF: f64 = 100.0;

/// A reroll is rejected when this many blue-side players keep the exact role
/// they had in the previous result.
pub const MAX_REPEATED_ROLES: usize = 4;

/// A reroll must move at least this many players onto the blue side.
pub const MIN_CHANGED_MEMBERS: usize = 2;

/// Largest roster for which partition search enumerates bit patterns.
///
/// Enumeration walks `1 << n` masks. Above this size the local-search strategy
/// is used instead.
pub const EXHAUSTIVE_ROSTER_LIMIT: usize = 20;

/// Hard ceiling for [`EXHAUSTIVE_ROSTER_LIMIT`] overrides: masks are `u64`.
pub const MAX_EXHAUSTIVE_ROSTER_LIMIT: usize = 63;

/// Largest roster accepted in free (role-less) mode.
pub const MAX_FREE_ROSTER_SIZE: usize = 64;

/// Players per side in role mode.
pub const ROLE_TEAM_SIZE: usize = 5;

/// Roster size required by role mode. Also the registration cap of a role-mode session.
pub const ROLE_ROSTER_SIZE: usize = ROLE_TEAM_SIZE * 2;

/// Number of sides. Every role has one slot per side.
pub const SIDES: usize = 2;
