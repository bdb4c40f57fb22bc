//! Clinch and elimination checks against the current standings.
//!
//! Both checks compare adjusted wins against the most a rival could still
//! reach by winning out. They ignore tie-breaks and the games rivals play
//! against each other, so a team reported as clinched or eliminated truly
//! is, but some decided races are reported late.

use crate::config::SeasonRules;
use crate::records::TeamRecord;

/// Games a team has left in the regular season.
pub fn remaining_games(record: &TeamRecord, rules: &SeasonRules) -> u32 {
    rules
        .regular_season_games
        .saturating_sub(record.record.total_games())
}

/// Whether `a`, winning its `remaining` games, reaches `b`'s current adjusted wins.
pub fn can_tie(a: &TeamRecord, b: &TeamRecord, remaining: u32) -> bool {
    a.record.adjusted_wins() + remaining as f64 >= b.record.adjusted_wins()
}

fn find<'a>(records: &[&'a TeamRecord], code: &str) -> Option<&'a TeamRecord> {
    records.iter().copied().find(|record| record.code == code)
}

/// The team can no longer finish level with its division leader or with any
/// current wildcard.
///
/// `records` holds the team's whole conference.
pub fn is_eliminated(
    records: &[&TeamRecord],
    division_winners: &[&str],
    wildcards: &[&str],
    code: &str,
    rules: &SeasonRules,
) -> bool {
    let Some(team) = find(records, code) else {
        return false;
    };
    let remaining = remaining_games(team, rules);

    let leader = division_winners
        .iter()
        .filter_map(|winner| find(records, winner))
        .find(|winner| winner.division == team.division);

    let can_tie_division = match leader {
        None => true,
        Some(leader) if leader.code == team.code => true,
        Some(leader) => {
            can_tie(team, leader, remaining) && remaining + remaining_games(leader, rules) > 0
        }
    };

    let can_tie_wildcard = wildcards.iter().any(|wildcard| {
        if *wildcard == code {
            return true;
        }
        find(records, wildcard).is_some_and(|holder| can_tie(team, holder, remaining))
    });

    !can_tie_division && !can_tie_wildcard
}

/// The team is guaranteed a playoff berth, either as division winner or as
/// one of the seeds no rival can still catch.
pub fn is_clinched(
    records: &[&TeamRecord],
    division_winners: &[&str],
    wildcards: &[&str],
    code: &str,
    rules: &SeasonRules,
) -> bool {
    let Some(team) = find(records, code) else {
        return false;
    };
    let rivals: Vec<&TeamRecord> = records
        .iter()
        .copied()
        .filter(|record| record.code != team.code)
        .collect();

    let is_division_winner = division_winners.contains(&code);
    let division_rivals: Vec<&TeamRecord> = rivals
        .iter()
        .copied()
        .filter(|record| record.division == team.division)
        .collect();
    let division_games_left: u32 = division_rivals
        .iter()
        .map(|record| remaining_games(record, rules))
        .sum();

    let guaranteed_division = is_division_winner
        && (division_games_left == 0
            || !division_rivals
                .iter()
                .any(|rival| can_tie(rival, team, remaining_games(rival, rules))));
    if guaranteed_division {
        return true;
    }

    let is_seeded = is_division_winner || wildcards.contains(&code);
    let challengers = rivals
        .iter()
        .filter(|rival| can_tie(rival, team, remaining_games(rival, rules)))
        .count();
    let conference_games_left: u32 = rivals
        .iter()
        .map(|record| remaining_games(record, rules))
        .sum();

    is_seeded
        && (challengers < rules.wildcard_spots + division_winners.len()
            || conference_games_left == 0)
}
