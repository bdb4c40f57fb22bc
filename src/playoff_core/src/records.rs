//! Per-team statistics derived from the decided games of a schedule.
//!
//! Every tie-break criterion reads one of these numbers, and the simulator
//! rebuilds them for each hypothetical season, so a `TeamRecord` is computed
//! eagerly once per schedule snapshot and is read-only afterwards.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::constants::COMMON_OPPONENT_MINIMUM;
use crate::league::League;
use crate::schedule::{Schedule, ScheduleWeek, WeekResult};
use crate::team::{Division, Team};

/// Win-loss-draw counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl WinLoss {
    pub fn new(wins: u32, losses: u32, draws: u32) -> Self {
        WinLoss {
            wins,
            losses,
            draws,
        }
    }

    pub fn add_result(&mut self, result: WeekResult) {
        match result {
            WeekResult::Win => self.wins += 1,
            WeekResult::Loss => self.losses += 1,
            WeekResult::Draw => self.draws += 1,
        }
    }

    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Wins with draws counted as half a win
    pub fn adjusted_wins(&self) -> f64 {
        self.wins as f64 + 0.5 * self.draws as f64
    }

    /// Win fraction; 0 when no games were played.
    pub fn wl(&self) -> f64 {
        let total = self.total_games();
        if total == 0 {
            0.0
        } else {
            self.adjusted_wins() / total as f64
        }
    }
}

impl Add for WinLoss {
    type Output = WinLoss;

    fn add(self, other: WinLoss) -> WinLoss {
        WinLoss {
            wins: self.wins + other.wins,
            losses: self.losses + other.losses,
            draws: self.draws + other.draws,
        }
    }
}

impl AddAssign for WinLoss {
    fn add_assign(&mut self, other: WinLoss) {
        *self = *self + other;
    }
}

impl Sum for WinLoss {
    fn sum<I: Iterator<Item = WinLoss>>(iter: I) -> WinLoss {
        iter.fold(WinLoss::default(), Add::add)
    }
}

impl fmt::Display for WinLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wins, self.losses, self.draws)
    }
}

/// Points scored and allowed over decided games with a known score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PointTotals {
    pub scored: i64,
    pub allowed: i64,
}

impl PointTotals {
    pub fn add_game(&mut self, scored: u32, allowed: u32) {
        self.scored += scored as i64;
        self.allowed += allowed as i64;
    }

    pub fn diff(&self) -> i64 {
        self.scored - self.allowed
    }
}

/// Everything the tie-break engine needs to know about one team.
#[derive(Clone, Debug, Serialize)]
pub struct TeamRecord {
    pub code: String,
    pub division: Division,
    pub record: WinLoss,
    pub division_record: WinLoss,
    pub conference_record: WinLoss,

    /// Combined record of every opponent beaten (once per win)
    pub strength_of_victory: WinLoss,

    /// Combined record of every opponent played (once per game)
    pub strength_of_schedule: WinLoss,

    pub points: PointTotals,
    pub conference_points: PointTotals,

    /// Decided record against each opponent faced
    #[serde(skip)]
    against: BTreeMap<String, WinLoss>,
}

impl TeamRecord {
    /// Distinct opponents faced in decided games.
    pub fn opponents(&self) -> impl Iterator<Item = &str> {
        self.against.keys().map(String::as_str)
    }

    /// Record against a single opponent.
    pub fn record_against(&self, opponent: &str) -> WinLoss {
        self.against.get(opponent).copied().unwrap_or_default()
    }

    /// Combined record against a set of opponents.
    pub fn head_to_head<'a, I>(&self, opponents: I) -> WinLoss
    where
        I: IntoIterator<Item = &'a str>,
    {
        opponents
            .into_iter()
            .map(|opponent| self.record_against(opponent))
            .sum()
    }

    /// Record against opponents shared with every team in `others`.
    ///
    /// `None` when fewer than four opponents are shared; the criterion is then
    /// inapplicable rather than a zero.
    pub fn common_record(&self, others: &[&TeamRecord]) -> Option<WinLoss> {
        let common: Vec<&str> = self
            .opponents()
            .filter(|opponent| others.iter().all(|other| other.against.contains_key(*opponent)))
            .collect();

        if common.len() < COMMON_OPPONENT_MINIMUM {
            return None;
        }
        Some(self.head_to_head(common))
    }
}

/// Count the results of the weeks whose opponent passes `include`.
fn filtered_record<'a, I, F>(weeks: I, include: F) -> WinLoss
where
    I: IntoIterator<Item = &'a ScheduleWeek>,
    F: Fn(&str) -> bool,
{
    let mut record = WinLoss::default();
    for week in weeks {
        if let Some(result) = week.result {
            if include(week.opponent.as_str()) {
                record.add_result(result);
            }
        }
    }
    record
}

/// Build one `TeamRecord` per requested team.
///
/// Overall records of every team in the schedule are computed once into a
/// lookup table, since each is re-read as an opponent record by many
/// strength-of-schedule sums.
pub fn get_records(schedule: &Schedule, league: &League, teams: &[&Team]) -> Vec<TeamRecord> {
    let overall: HashMap<&str, WinLoss> = schedule
        .teams()
        .map(|(code, weeks)| (code, filtered_record(weeks, |_| true)))
        .collect();

    teams
        .iter()
        .map(|team| build_record(team, schedule, league, &overall))
        .collect()
}

fn build_record(
    team: &Team,
    schedule: &Schedule,
    league: &League,
    overall: &HashMap<&str, WinLoss>,
) -> TeamRecord {
    let weeks: Vec<&ScheduleWeek> = schedule
        .weeks(&team.code)
        .iter()
        .filter(|week| week.is_decided())
        .collect();

    let conference = team.conference();
    let in_division = |opponent: &str| league.division_of(opponent) == Some(team.division);
    let in_conference = |opponent: &str| league.conference_of(opponent) == Some(conference);
    let opponent_record = |week: &&ScheduleWeek| -> WinLoss {
        overall
            .get(week.opponent.as_str())
            .copied()
            .unwrap_or_default()
    };

    let mut against: BTreeMap<String, WinLoss> = BTreeMap::new();
    let mut points = PointTotals::default();
    let mut conference_points = PointTotals::default();
    for week in &weeks {
        if let Some(result) = week.result {
            against
                .entry(week.opponent.clone())
                .or_default()
                .add_result(result);
        }
        if let Some((scored, allowed)) = week.points() {
            points.add_game(scored, allowed);
            if in_conference(week.opponent.as_str()) {
                conference_points.add_game(scored, allowed);
            }
        }
    }

    TeamRecord {
        code: team.code.clone(),
        division: team.division,
        record: filtered_record(weeks.iter().copied(), |_| true),
        division_record: filtered_record(weeks.iter().copied(), in_division),
        conference_record: filtered_record(weeks.iter().copied(), in_conference),
        strength_of_victory: weeks
            .iter()
            .filter(|week| week.result == Some(WeekResult::Win))
            .map(opponent_record)
            .sum(),
        strength_of_schedule: weeks.iter().map(opponent_record).sum(),
        points,
        conference_points,
        against,
    }
}
