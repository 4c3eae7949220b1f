/// Roster file parsing.
///
/// Two formats, auto-detected:
/// - a JSON array of entries (`name`, `rating` or `rank`, `roles`, `strict`, `pinned`, optional `id`)
/// - one participant per line: `name; rating-or-rank; roles; flags`
///
/// Lines starting with `#` are comments. Ids default to the 1-based entry position.
use serde::Deserialize;
use teamsplit_core::{parse_rank, Participant, Role, RoleSet};

#[derive(Debug, Deserialize)]
struct RosterEntry {
    id: Option<i64>,
    name: String,
    rating: Option<f64>,
    rank: Option<String>,
    roles: Option<Vec<Role>>,
    #[serde(default)]
    strict: bool,
    #[serde(default)]
    pinned: bool,
}

/// Parse a roster, JSON or line format.
pub fn parse_roster(content: &str) -> Result<Vec<Participant>, String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let entries: Vec<RosterEntry> = serde_json::from_str(trimmed)
            .map_err(|e| format!("roster looks like JSON but failed to parse: {e}"))?;
        entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| from_entry(i, entry))
            .collect()
    } else {
        trimmed
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .enumerate()
            .map(|(i, line)| parse_line(i, line))
            .collect()
    }
}

fn from_entry(index: usize, entry: RosterEntry) -> Result<Participant, String> {
    let rating = match (entry.rating, entry.rank.as_deref()) {
        (Some(rating), _) => rating,
        (None, Some(rank)) => parse_rank(rank).map_err(|e| format!("{}: {e}", entry.name))?,
        (None, None) => return Err(format!("{}: needs a \"rating\" or a \"rank\"", entry.name)),
    };
    let mut participant = Participant::new(entry.id.unwrap_or(index as i64 + 1), entry.name, rating);
    if let Some(roles) = entry.roles {
        participant.preferred_roles = RoleSet::from(roles);
    }
    participant.strict = entry.strict;
    participant.pinned = entry.pinned;
    Ok(participant)
}

/// `name; rating-or-rank; roles; flags`. Everything after the name is optional.
fn parse_line(index: usize, line: &str) -> Result<Participant, String> {
    let mut fields = line.split(';').map(str::trim);
    let name = fields.next().filter(|n| !n.is_empty()).ok_or_else(|| format!("line {}: missing name", index + 1))?;

    let rating = match fields.next().filter(|f| !f.is_empty()) {
        Some(field) => parse_rating(field).map_err(|e| format!("{name}: {e}"))?,
        None => 0.0,
    };

    let mut participant = Participant::new(index as i64 + 1, name, rating);

    if let Some(field) = fields.next() {
        participant.preferred_roles = parse_roles(field).map_err(|e| format!("{name}: {e}"))?;
    }

    if let Some(field) = fields.next() {
        for flag in field.split([',', ' ']).map(str::trim).filter(|f| !f.is_empty()) {
            match flag.to_ascii_lowercase().as_str() {
                "strict" => participant.strict = true,
                "pinned" | "pin" => participant.pinned = true,
                other => return Err(format!("{name}: unknown flag \"{other}\"")),
            }
        }
    }

    if fields.next().is_some() {
        return Err(format!("{name}: too many fields (expected name; rating; roles; flags)"));
    }
    Ok(participant)
}

/// A bare number is a rating; anything else is read as a ladder rank.
fn parse_rating(field: &str) -> Result<f64, String> {
    match field.parse::<f64>() {
        Ok(rating) if rating.is_finite() => Ok(rating),
        Ok(_) => Err(format!("rating \"{field}\" is not a finite number")),
        Err(_) => parse_rank(field),
    }
}

fn parse_roles(field: &str) -> Result<RoleSet, String> {
    match field.to_ascii_lowercase().as_str() {
        "" | "all" | "any" | "*" => Ok(RoleSet::full()),
        "none" | "-" => Ok(RoleSet::empty()),
        list => list
            .split([',', '/'])
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::parse::<Role>)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let roster = parse_roster(
            "# friday night\n\
             Alice; 2400; mid, top; strict\n\
             Bob; GOLD II 40; adc/sup\n\
             \n\
             Cara; master 120; all; pinned\n\
             Dan\n",
        )
        .unwrap();

        assert_eq!(roster.len(), 4);
        assert_eq!(roster[0].id, 1);
        assert_eq!(roster[0].name, "Alice");
        assert_eq!(roster[0].rating, 2400.0);
        assert_eq!(roster[0].preferred_roles.iter().collect::<Vec<_>>(), vec![Role::Top, Role::Mid]);
        assert!(roster[0].strict);

        assert_eq!(roster[1].rating, 1440.0);
        assert_eq!(
            roster[1].preferred_roles.iter().collect::<Vec<_>>(),
            vec![Role::Marksman, Role::Support]
        );
        assert!(!roster[1].strict);

        assert_eq!(roster[2].id, 3);
        assert_eq!(roster[2].rating, 2920.0);
        assert!(roster[2].preferred_roles.is_full());
        assert!(roster[2].pinned);

        assert_eq!(roster[3].rating, 0.0);
        assert!(roster[3].preferred_roles.is_full());
    }

    #[test]
    fn test_json_format() {
        let roster = parse_roster(
            r#"[
                {"name": "Alice", "rating": 2400, "roles": ["mid"], "strict": true},
                {"id": 42, "name": "Bob", "rank": "emerald i"},
                {"name": "Cara", "rating": 900, "roles": []}
            ]"#,
        )
        .unwrap();

        assert_eq!(roster[0].id, 1);
        assert!(roster[0].is_strict_committed());
        assert_eq!(roster[1].id, 42);
        assert_eq!(roster[1].rating, 2300.0);
        assert!(roster[1].preferred_roles.is_full());
        assert!(roster[2].preferred_roles.is_empty());
    }

    #[test]
    fn test_errors_name_the_participant() {
        let err = parse_roster("Alice; 2400; feeder").unwrap_err();
        assert!(err.contains("Alice") && err.contains("feeder"), "{err}");

        let err = parse_roster("Bob; wood V").unwrap_err();
        assert!(err.contains("Bob"), "{err}");

        let err = parse_roster("Cara; 1000; all; smurf").unwrap_err();
        assert!(err.contains("smurf"), "{err}");

        let err = parse_roster("Dan; 1000; all; strict; extra").unwrap_err();
        assert!(err.contains("too many fields"), "{err}");

        let err = parse_roster(r#"[{"name": "Eve"}]"#).unwrap_err();
        assert!(err.contains("Eve"), "{err}");

        assert!(parse_roster("[not json").unwrap_err().contains("JSON"));
    }

    #[test]
    fn test_role_aliases_and_wildcards() {
        assert!(parse_roles("ANY").unwrap().is_full());
        assert!(parse_roles("none").unwrap().is_empty());
        let set = parse_roles("jg, bot").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Role::Jungle, Role::Marksman]);
    }
}
