/// Config file loading and creation for the teamsplit CLI.
///
/// Config lives at ~/.config/teamsplit/config.toml.
/// All fields are optional. CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use teamsplit_core::constants::MAX_EXHAUSTIVE_ROSTER_LIMIT;
use teamsplit_core::{SearchConfig, SearchStrategy};

use crate::bail;

#[derive(Deserialize, Default, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TeamsplitConfig {
    pub mode: Option<String>,
    pub strategy: Option<SearchStrategy>,
    pub bot_lane_weight: Option<f64>,
    pub solo_lane_weight: Option<f64>,
    pub max_combinations: Option<usize>,
    pub max_attempts: Option<usize>,
    pub good_enough_total_diff: Option<f64>,
    pub good_enough_bot_diff: Option<f64>,
    pub max_repeated_roles: Option<usize>,
    pub min_changed_members: Option<usize>,
    pub exhaustive_roster_limit: Option<usize>,
}

impl TeamsplitConfig {
    /// Search settings: built-in defaults with any configured values on top.
    ///
    /// Rejects values the search cannot run with.
    pub fn search_config(&self) -> Result<SearchConfig, String> {
        let mut search = SearchConfig::default();
        if let Some(v) = self.strategy {
            search.strategy = v;
        }
        if let Some(v) = self.bot_lane_weight {
            search.weights.bot_lane = v;
        }
        if let Some(v) = self.solo_lane_weight {
            search.weights.solo_lane = v;
        }
        if let Some(v) = self.max_combinations {
            search.max_combinations = v;
        }
        if let Some(v) = self.max_attempts {
            search.max_attempts = v;
        }
        if let Some(v) = self.good_enough_total_diff {
            search.good_enough_total_diff = v;
        }
        if let Some(v) = self.good_enough_bot_diff {
            search.good_enough_bot_diff = v;
        }
        if let Some(v) = self.max_repeated_roles {
            search.max_repeated_roles = v;
        }
        if let Some(v) = self.min_changed_members {
            search.min_changed_members = v;
        }
        if let Some(v) = self.exhaustive_roster_limit {
            if v > MAX_EXHAUSTIVE_ROSTER_LIMIT {
                return Err(format!(
                    "exhaustive_roster_limit must be at most {MAX_EXHAUSTIVE_ROSTER_LIMIT}, got {v}"
                ));
            }
            search.exhaustive_roster_limit = v;
        }
        Ok(search)
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# teamsplit configuration
# All values here can be overridden by CLI flags.

# Split mode: \"roles\" (10 players, 5 roles per side) or \"free\" (any even roster)
# mode = \"roles\"

# Partition search: \"auto\", \"exhaustive\" or \"local-search\"
# strategy = \"auto\"

# Balance score = total diff + bot_lane_weight * bot diff + solo_lane_weight * worst solo lane diff
# bot_lane_weight = 1.5
# solo_lane_weight = 0.5

# Splits inspected per search call, and search calls per build or reroll
# max_combinations = 5000
# max_attempts = 100

# Stop early once a split is at least this balanced
# good_enough_total_diff = 50.0
# good_enough_bot_diff = 100.0

# Reroll: reject a split if this many blue players keep their role...
# max_repeated_roles = 4
# ...or if fewer than this many new players joined blue
# min_changed_members = 2

# Largest roster searched exhaustively (at most 63); larger rosters use local search
# exhaustive_roster_limit = 20
";

/// Returns the default config path: ~/.config/teamsplit/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("teamsplit").join("config.toml")
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> TeamsplitConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => TeamsplitConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

fn parse_config(content: &str) -> Result<TeamsplitConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}
