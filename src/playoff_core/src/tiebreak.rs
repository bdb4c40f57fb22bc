//! Ordering of teams that finished with the same win fraction.
//!
//! A criterion cascade is evaluated against the whole tied group; the first
//! criterion that tells any two teams apart names a winner, who is peeled off
//! the front before the rest of the group is broken again from the top of the
//! cascade.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::TiebreakError;
use crate::records::TeamRecord;
use crate::team::Division;

/// Which cascade a tie is broken with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiebreakKind {
    /// Teams of one division
    Division,
    /// Teams of different divisions (wildcard race)
    Conference,
}

impl TiebreakKind {
    pub fn criteria(self) -> &'static [Criterion] {
        match self {
            TiebreakKind::Division => &DIVISION_CRITERIA,
            TiebreakKind::Conference => &CONFERENCE_CRITERIA,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    HeadToHead,
    DivisionRecord,
    CommonGames,
    ConferenceRecord,
    StrengthOfVictory,
    StrengthOfSchedule,
    ConferencePoints,
    Points,
}

pub const DIVISION_CRITERIA: [Criterion; 8] = [
    Criterion::HeadToHead,
    Criterion::DivisionRecord,
    Criterion::CommonGames,
    Criterion::ConferenceRecord,
    Criterion::StrengthOfVictory,
    Criterion::StrengthOfSchedule,
    Criterion::ConferencePoints,
    Criterion::Points,
];

pub const CONFERENCE_CRITERIA: [Criterion; 7] = [
    Criterion::HeadToHead,
    Criterion::ConferenceRecord,
    Criterion::CommonGames,
    Criterion::StrengthOfVictory,
    Criterion::StrengthOfSchedule,
    Criterion::ConferencePoints,
    Criterion::Points,
];

impl Criterion {
    /// One value per team in `group`, higher is better.
    ///
    /// `None` when the criterion does not apply to this group: head-to-head in
    /// a conference tie of more than two teams, or common games when fewer
    /// than four opponents are shared.
    pub fn values(self, group: &[&TeamRecord], kind: TiebreakKind) -> Option<Vec<f64>> {
        match self {
            // TODO: three-or-more-team sweep rule for conference ties.
            Criterion::HeadToHead if kind == TiebreakKind::Conference && group.len() != 2 => None,
            Criterion::HeadToHead => Some(
                group
                    .iter()
                    .map(|record| record.head_to_head(rivals(group, record)).wl())
                    .collect(),
            ),
            Criterion::CommonGames => group
                .iter()
                .map(|record| {
                    let others: Vec<&TeamRecord> = group
                        .iter()
                        .copied()
                        .filter(|other| other.code != record.code)
                        .collect();
                    record.common_record(&others).map(|common| common.wl())
                })
                .collect(),
            Criterion::DivisionRecord => Some(map_values(group, |r| r.division_record.wl())),
            Criterion::ConferenceRecord => Some(map_values(group, |r| r.conference_record.wl())),
            Criterion::StrengthOfVictory => {
                Some(map_values(group, |r| r.strength_of_victory.wl()))
            }
            Criterion::StrengthOfSchedule => {
                Some(map_values(group, |r| r.strength_of_schedule.wl()))
            }
            Criterion::ConferencePoints => {
                Some(map_values(group, |r| r.conference_points.diff() as f64))
            }
            Criterion::Points => Some(map_values(group, |r| r.points.diff() as f64)),
        }
    }
}

fn map_values<F: Fn(&TeamRecord) -> f64>(group: &[&TeamRecord], value: F) -> Vec<f64> {
    group.iter().map(|&record| value(record)).collect()
}

/// Codes of every other team in the group.
fn rivals<'a>(group: &'a [&'a TeamRecord], record: &'a TeamRecord) -> impl Iterator<Item = &'a str> {
    group
        .iter()
        .filter(move |other| other.code != record.code)
        .map(|other| other.code.as_str())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TiebreakResult {
    /// Best team of the group, placed in front
    Winner,
    /// Worst team of the group, placed at the back
    Eliminated,
}

/// A resolved comparison: which team of the group moves, where, and why.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tiebreak {
    pub result: TiebreakResult,
    pub index: usize,
    pub criterion: Criterion,
}

/// Index of the first team holding the maximum, unless every value is equal.
fn distinct_maximum(values: &[f64]) -> Option<usize> {
    let first = *values.first()?;
    if values.iter().all(|&value| value == first) {
        return None;
    }

    let mut best = 0;
    for (index, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = index;
        }
    }
    Some(best)
}

/// Run the cascade for `kind` until one criterion separates the group.
pub fn find_tiebreak(group: &[&TeamRecord], kind: TiebreakKind) -> Option<Tiebreak> {
    kind.criteria().iter().find_map(|&criterion| {
        let values = criterion.values(group, kind)?;
        let index = distinct_maximum(&values)?;
        Some(Tiebreak {
            result: TiebreakResult::Winner,
            index,
            criterion,
        })
    })
}

fn unresolved(group: &[&TeamRecord]) -> TiebreakError {
    TiebreakError::Unresolved {
        teams: group.iter().map(|record| record.code.clone()).collect(),
    }
}

/// First division, in group order, with more than one team in the group.
fn colliding_division(records: &[&TeamRecord]) -> Option<Division> {
    records
        .iter()
        .map(|record| record.division)
        .find(|&division| records.iter().filter(|r| r.division == division).count() > 1)
}

/// Order a group of teams with equal win fraction.
///
/// With `is_division_tie` unset, teams sharing a division are first settled
/// among themselves with the division cascade, so only one club per division
/// is compared against the rest at a time.
pub fn break_ties<'a>(
    records: Vec<&'a TeamRecord>,
    is_division_tie: bool,
) -> Result<Vec<&'a TeamRecord>, TiebreakError> {
    if records.len() <= 1 {
        return Ok(records);
    }

    let is_division = is_division_tie
        || records
            .iter()
            .all(|record| record.division == records[0].division);

    if !is_division_tie {
        if let Some(division) = colliding_division(&records) {
            let positions: Vec<usize> = records
                .iter()
                .enumerate()
                .filter(|(_, record)| record.division == division)
                .map(|(position, _)| position)
                .collect();
            let division_records: Vec<&TeamRecord> =
                positions.iter().map(|&position| records[position]).collect();

            let tiebreak = find_tiebreak(&division_records, TiebreakKind::Division)
                .ok_or_else(|| unresolved(&division_records))?;

            return peel(
                records,
                Tiebreak {
                    index: positions[tiebreak.index],
                    ..tiebreak
                },
                is_division,
            );
        }
    }

    let kind = if is_division {
        TiebreakKind::Division
    } else {
        TiebreakKind::Conference
    };
    let tiebreak = find_tiebreak(&records, kind).ok_or_else(|| unresolved(&records))?;
    peel(records, tiebreak, is_division)
}

/// Move the decided team to its end of the group and break the remainder.
fn peel<'a>(
    mut records: Vec<&'a TeamRecord>,
    tiebreak: Tiebreak,
    is_division: bool,
) -> Result<Vec<&'a TeamRecord>, TiebreakError> {
    let decided = records.remove(tiebreak.index);
    trace!(
        team = %decided.code,
        criterion = ?tiebreak.criterion,
        result = ?tiebreak.result,
        remaining = records.len(),
        "tie broken"
    );

    let mut rest = break_ties(records, is_division)?;
    match tiebreak.result {
        TiebreakResult::Winner => rest.insert(0, decided),
        TiebreakResult::Eliminated => rest.push(decided),
    }
    Ok(rest)
}

/// Order teams of one division.
pub fn break_division_tie<'a>(
    records: Vec<&'a TeamRecord>,
) -> Result<Vec<&'a TeamRecord>, TiebreakError> {
    break_ties(records, true)
}

/// Order teams competing for wildcard berths.
pub fn break_wildcard_tie<'a>(
    records: Vec<&'a TeamRecord>,
) -> Result<Vec<&'a TeamRecord>, TiebreakError> {
    break_ties(records, false)
}
