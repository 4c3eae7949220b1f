/// Output formatting: terminal table and JSON.
use serde::Serialize;
use teamsplit_core::{ScoreBreakdown, Side, Team, TeamResult};

use crate::bail;

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    result: &'a TeamResult,
    balance: &'a ScoreBreakdown,
}

/// Print both teams as terminal tables, then the balance summary.
pub fn print_table(result: &TeamResult, balance: &ScoreBreakdown) {
    let name_width = result
        .blue
        .members
        .iter()
        .chain(&result.red.members)
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Name"

    for side in [Side::Blue, Side::Red] {
        print_team(side, result.team(side), name_width);
        println!();
    }

    println!(
        "Rating gap {:.1} | total diff {:.0} | bot lane diff {:.0} | worst solo lane diff {:.0} | score {:.1}",
        result.rating_gap, balance.total_diff, balance.bot_diff, balance.lane_diff, balance.score,
    );
}

fn print_team(side: Side, team: &Team, name_width: usize) {
    println!(
        "{} | avg {:.0} | {}",
        side.to_string().to_uppercase(),
        team.average_rating,
        team.tier,
    );
    println!(" Slot     | {:<name_width$} | Rating | Prefers", "Name");
    println!("----------|-{}-|--------|--------", "-".repeat(name_width));

    for (seat, p) in team.members.iter().enumerate() {
        let slot = match p.assigned_role {
            Some(role) => role.to_string(),
            None => seat.to_string(),
        };
        let strict = if p.is_strict_committed() { " (strict)" } else { "" };
        println!(
            " {:<8} | {:<name_width$} | {:>6.0} | {}{}",
            slot, p.name, p.rating, p.preferred_roles, strict,
        );
    }
}

/// Print the result and its balance as JSON.
pub fn print_json(result: &TeamResult, balance: &ScoreBreakdown) {
    let output = JsonOutput { result, balance };
    let json = serde_json::to_string_pretty(&output)
        .unwrap_or_else(|e| bail(format!("Failed to serialize result: {e}")));
    println!("{json}");
}
