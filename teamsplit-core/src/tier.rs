/// Ranked ladder ⇄ rating conversion.
///
/// Ratings are `tier base + division base + LP`. Tiers below Master are 400
/// points wide and split into four 100-point divisions. Master, Grandmaster
/// and Challenger have no divisions.
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Tier {
    Unranked,
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    /// Laddered tiers from lowest to highest.
    const LADDER: [Tier; 10] = [
        Tier::Iron,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Emerald,
        Tier::Diamond,
        Tier::Master,
        Tier::Grandmaster,
        Tier::Challenger,
    ];

    pub fn base_rating(self) -> f64 {
        match self {
            Tier::Unranked | Tier::Iron => 0.0,
            Tier::Bronze => 400.0,
            Tier::Silver => 800.0,
            Tier::Gold => 1200.0,
            Tier::Platinum => 1600.0,
            Tier::Emerald => 2000.0,
            Tier::Diamond => 2400.0,
            Tier::Master => 2800.0,
            Tier::Grandmaster => 3200.0,
            Tier::Challenger => 3600.0,
        }
    }

    pub fn has_divisions(self) -> bool {
        !matches!(self, Tier::Unranked | Tier::Master | Tier::Grandmaster | Tier::Challenger)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Unranked => "UNRANKED",
            Tier::Iron => "IRON",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Emerald => "EMERALD",
            Tier::Diamond => "DIAMOND",
            Tier::Master => "MASTER",
            Tier::Grandmaster => "GRANDMASTER",
            Tier::Challenger => "CHALLENGER",
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if upper == "UNRANKED" {
            return Ok(Tier::Unranked);
        }
        Tier::LADDER
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| format!("unknown tier \"{s}\""))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Division {
    IV,
    III,
    II,
    I,
}

impl Division {
    pub fn base_rating(self) -> f64 {
        match self {
            Division::IV => 0.0,
            Division::III => 100.0,
            Division::II => 200.0,
            Division::I => 300.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Division::IV => "IV",
            Division::III => "III",
            Division::II => "II",
            Division::I => "I",
        }
    }
}

impl FromStr for Division {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IV" | "4" => Ok(Division::IV),
            "III" | "3" => Ok(Division::III),
            "II" | "2" => Ok(Division::II),
            "I" | "1" => Ok(Division::I),
            other => Err(format!("unknown division \"{other}\"")),
        }
    }
}

/// A tier with its division, e.g. GOLD II or MASTER.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierLabel {
    pub tier: Tier,
    pub division: Option<Division>,
}

impl fmt::Display for TierLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.division {
            Some(division) => write!(f, "{} {}", self.tier.as_str(), division.as_str()),
            None => f.write_str(self.tier.as_str()),
        }
    }
}

/// Maps a rating onto a display tier.
///
/// Team results use this to label each side's mean rating. Swap it out to
/// label ratings from a different ladder.
pub trait TierScale {
    fn label(&self, rating: f64) -> TierLabel;
}

/// The standard ranked ladder.
#[derive(Debug, Clone, Copy, Default)]
pub struct LadderTiers;

impl TierScale for LadderTiers {
    fn label(&self, rating: f64) -> TierLabel {
        rating_to_tier(rating)
    }
}

/// Rating for a ladder position. Division is ignored for apex tiers.
pub fn tier_to_rating(tier: Tier, division: Option<Division>, lp: u32) -> f64 {
    let division_base = if tier.has_divisions() {
        division.map(Division::base_rating).unwrap_or(0.0)
    } else {
        0.0
    };
    tier.base_rating() + division_base + lp as f64
}

/// Ladder position for a rating.
pub fn rating_to_tier(rating: f64) -> TierLabel {
    if rating.is_nan() || rating < 0.0 {
        return TierLabel { tier: Tier::Unranked, division: None };
    }
    if rating >= Tier::Challenger.base_rating() {
        return TierLabel { tier: Tier::Challenger, division: None };
    }
    if rating >= Tier::Grandmaster.base_rating() {
        return TierLabel { tier: Tier::Grandmaster, division: None };
    }
    if rating >= Tier::Master.base_rating() {
        return TierLabel { tier: Tier::Master, division: None };
    }

    let tier = Tier::LADDER
        .into_iter()
        .filter(|t| t.has_divisions())
        .rev()
        .find(|t| rating >= t.base_rating())
        .unwrap_or(Tier::Iron);

    let within = rating - tier.base_rating();
    let division = if within >= 300.0 {
        Division::I
    } else if within >= 200.0 {
        Division::II
    } else if within >= 100.0 {
        Division::III
    } else {
        Division::IV
    };

    TierLabel { tier, division: Some(division) }
}

/// Parse "GOLD II 40", "master 120", "emerald 1" or "unranked" into a rating.
pub fn parse_rank(text: &str) -> Result<f64, String> {
    let mut parts = text.split_whitespace();
    let tier: Tier = parts
        .next()
        .ok_or_else(|| "empty rank".to_string())?
        .parse()?;

    let mut division = None;
    let mut lp = 0u32;
    for part in parts {
        if division.is_none() && tier.has_divisions() {
            if let Ok(d) = part.parse::<Division>() {
                division = Some(d);
                continue;
            }
        }
        lp = part
            .trim_end_matches("LP")
            .trim_end_matches("lp")
            .parse()
            .map_err(|_| format!("invalid LP \"{part}\" in rank \"{text}\""))?;
    }

    Ok(tier_to_rating(tier, division, lp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_to_rating() {
        assert_eq!(tier_to_rating(Tier::Iron, Some(Division::IV), 0), 0.0);
        assert_eq!(tier_to_rating(Tier::Gold, Some(Division::II), 40), 1440.0);
        assert_eq!(tier_to_rating(Tier::Master, Some(Division::I), 120), 2920.0);
        assert_eq!(tier_to_rating(Tier::Unranked, None, 0), 0.0);
    }

    #[test]
    fn test_rating_to_tier_boundaries() {
        assert_eq!(rating_to_tier(3600.0).to_string(), "CHALLENGER");
        assert_eq!(rating_to_tier(3599.0).to_string(), "GRANDMASTER");
        assert_eq!(rating_to_tier(2800.0).to_string(), "MASTER");
        assert_eq!(rating_to_tier(2799.0).to_string(), "DIAMOND I");
        assert_eq!(rating_to_tier(1440.0).to_string(), "GOLD II");
        assert_eq!(rating_to_tier(1200.0).to_string(), "GOLD IV");
        assert_eq!(rating_to_tier(0.0).to_string(), "IRON IV");
        assert_eq!(rating_to_tier(-5.0).to_string(), "UNRANKED");
    }

    #[test]
    fn test_round_trip_through_ladder() {
        for tier in Tier::LADDER.into_iter().filter(|t| t.has_divisions()) {
            for division in [Division::IV, Division::III, Division::II, Division::I] {
                let label = rating_to_tier(tier_to_rating(tier, Some(division), 50));
                assert_eq!(label, TierLabel { tier, division: Some(division) });
            }
        }
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(parse_rank("GOLD II 40"), Ok(1440.0));
        assert_eq!(parse_rank("gold 2 40lp"), Ok(1440.0));
        assert_eq!(parse_rank("master 120"), Ok(2920.0));
        assert_eq!(parse_rank("emerald i"), Ok(2300.0));
        assert_eq!(parse_rank("unranked"), Ok(0.0));
        assert!(parse_rank("wood V").is_err());
        assert!(parse_rank("").is_err());
    }
}
