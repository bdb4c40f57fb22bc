use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ScheduleError;
use crate::league::League;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekResult {
    Win,
    Loss,
    Draw,
}

impl WeekResult {
    /// The same game seen from the opponent's side.
    pub fn inverse(self) -> Self {
        match self {
            WeekResult::Win => WeekResult::Loss,
            WeekResult::Loss => WeekResult::Win,
            WeekResult::Draw => WeekResult::Draw,
        }
    }

    pub fn from_scores(own: u32, other: u32) -> Self {
        if own > other {
            WeekResult::Win
        } else if own < other {
            WeekResult::Loss
        } else {
            WeekResult::Draw
        }
    }
}

/// One game from one team's perspective.
///
/// Scores are stored as home/away, so both sides of a game carry the same pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWeek {
    pub opponent: String,
    pub away: bool,
    pub week: u32,

    /// `None` while the game is still to be played
    pub result: Option<WeekResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u32>,
}

impl ScheduleWeek {
    pub fn is_decided(&self) -> bool {
        self.result.is_some()
    }

    /// (points scored, points allowed) when the score is known.
    pub fn points(&self) -> Option<(u32, u32)> {
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) if self.away => Some((away, home)),
            (Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }
}

/// Per-team week lists, byes removed.
///
/// Teams are kept in code order so every traversal of a schedule (and every
/// outcome enumeration built on it) is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    teams: BTreeMap<String, Vec<ScheduleWeek>>,
}

#[derive(Deserialize)]
struct RawScheduleData {
    weeks: Vec<Vec<RawScheduleGame>>,
}

/// A game as delivered by the schedule feed; `team_a` is the home team.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScheduleGame {
    week: u32,
    team_a: String,
    team_b: String,
    #[serde(default)]
    team_a_score: Option<u32>,
    #[serde(default)]
    team_b_score: Option<u32>,
}

impl Schedule {
    pub fn new() -> Self {
        Schedule::default()
    }

    /// Parse the feed format `{"weeks": [[{week, teamA, teamB, teamAScore, teamBScore}]]}`.
    ///
    /// Teams may be given by full name or code. Every league team gets an
    /// entry, even one without games.
    pub fn from_raw_json(json: &str, league: &League) -> Result<Self, ScheduleError> {
        let data: RawScheduleData = serde_json::from_str(json)?;

        let mut schedule = Schedule::new();
        for team in league.teams() {
            schedule.add_team(&team.code);
        }

        for game in data.weeks.iter().flatten() {
            let home = league
                .find(&game.team_a)
                .ok_or_else(|| ScheduleError::UnknownTeam {
                    name: game.team_a.clone(),
                })?;
            let away = league
                .find(&game.team_b)
                .ok_or_else(|| ScheduleError::UnknownTeam {
                    name: game.team_b.clone(),
                })?;
            schedule.add_game(
                game.week,
                &home.code,
                &away.code,
                game.team_a_score,
                game.team_b_score,
            );
        }

        Ok(schedule)
    }

    /// Parse a per-team schedule (`{"KC": [{opponent, away, week, result, ...}]}`).
    ///
    /// Fails on the first game that is not mirrored on the opponent's side.
    pub fn from_json_str(json: &str) -> Result<Self, ScheduleError> {
        let schedule: Schedule = serde_json::from_str(json)?;
        schedule.validate()?;
        Ok(schedule)
    }

    /// Build from week lists where byes are explicit `None` entries.
    pub fn from_weeks_with_byes(weeks: BTreeMap<String, Vec<Option<ScheduleWeek>>>) -> Self {
        let teams = weeks
            .into_iter()
            .map(|(team, weeks)| (team, weeks.into_iter().flatten().collect()))
            .collect();
        Schedule { teams }
    }

    pub fn add_team(&mut self, code: &str) {
        self.teams.entry(code.to_string()).or_default();
    }

    /// Add both sides of a game. The result is derived from the scores and is
    /// undecided unless both are known.
    pub fn add_game(
        &mut self,
        week: u32,
        home: &str,
        away: &str,
        home_score: Option<u32>,
        away_score: Option<u32>,
    ) {
        let home_result = match (home_score, away_score) {
            (Some(h), Some(a)) => Some(WeekResult::from_scores(h, a)),
            _ => None,
        };

        self.teams.entry(home.to_string()).or_default().push(ScheduleWeek {
            opponent: away.to_string(),
            away: false,
            week,
            result: home_result,
            home_score,
            away_score,
        });
        self.teams.entry(away.to_string()).or_default().push(ScheduleWeek {
            opponent: home.to_string(),
            away: true,
            week,
            result: home_result.map(WeekResult::inverse),
            home_score,
            away_score,
        });
    }

    /// Add both sides of a decided game whose score is unknown.
    pub fn add_result(&mut self, week: u32, home: &str, away: &str, home_won: bool) {
        let home_result = if home_won {
            WeekResult::Win
        } else {
            WeekResult::Loss
        };

        self.teams.entry(home.to_string()).or_default().push(ScheduleWeek {
            opponent: away.to_string(),
            away: false,
            week,
            result: Some(home_result),
            home_score: None,
            away_score: None,
        });
        self.teams.entry(away.to_string()).or_default().push(ScheduleWeek {
            opponent: home.to_string(),
            away: true,
            week,
            result: Some(home_result.inverse()),
            home_score: None,
            away_score: None,
        });
    }

    /// Decide a game already on the schedule, on both sides.
    ///
    /// Scores are left untouched. Returns false, changing nothing, if `home`
    /// has no game at home against `away` in `week`.
    pub fn set_result(&mut self, week: u32, home: &str, away: &str, home_result: WeekResult) -> bool {
        let position = |team: &str, opponent: &str, is_away: bool| {
            self.weeks(team).iter().position(|game| {
                game.week == week && game.opponent == opponent && game.away == is_away
            })
        };
        let (Some(home_index), Some(away_index)) = (position(home, away, false), position(away, home, true))
        else {
            return false;
        };

        if let Some(weeks) = self.teams.get_mut(home) {
            weeks[home_index].result = Some(home_result);
        }
        if let Some(weeks) = self.teams.get_mut(away) {
            weeks[away_index].result = Some(home_result.inverse());
        }
        true
    }

    /// Weeks of a team; empty for an unknown team.
    pub fn weeks(&self, code: &str) -> &[ScheduleWeek] {
        self.teams.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn teams(&self) -> impl Iterator<Item = (&str, &[ScheduleWeek])> {
        self.teams
            .iter()
            .map(|(team, weeks)| (team.as_str(), weeks.as_slice()))
    }

    pub fn team_codes(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }

    pub fn games_played(&self, code: &str) -> u32 {
        self.weeks(code).iter().filter(|week| week.is_decided()).count() as u32
    }

    /// Copy keeping only played games (every team keeps its entry).
    pub fn decided(&self) -> Schedule {
        self.filter_weeks(ScheduleWeek::is_decided)
    }

    /// Copy keeping only games still to be played.
    pub fn undecided(&self) -> Schedule {
        self.filter_weeks(|week| !week.is_decided())
    }

    fn filter_weeks<F: Fn(&ScheduleWeek) -> bool>(&self, keep: F) -> Schedule {
        let teams = self
            .teams
            .iter()
            .map(|(team, weeks)| {
                let kept = weeks.iter().filter(|week| keep(*week)).cloned().collect();
                (team.clone(), kept)
            })
            .collect();
        Schedule { teams }
    }

    /// Concatenate the week lists of both schedules per team.
    pub fn merge(&self, other: &Schedule) -> Schedule {
        let mut merged = self.clone();
        for (team, weeks) in &other.teams {
            merged
                .teams
                .entry(team.clone())
                .or_default()
                .extend(weeks.iter().cloned());
        }
        merged
    }

    /// Check that every game appears on both sides with inverted results.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (team, weeks) in &self.teams {
            for week in weeks {
                let counterpart = self
                    .weeks(&week.opponent)
                    .iter()
                    .find(|other| other.opponent == *team && other.week == week.week)
                    .ok_or_else(|| ScheduleError::MissingCounterpart {
                        team: team.clone(),
                        opponent: week.opponent.clone(),
                        week: week.week,
                    })?;

                let asymmetric = |reason| ScheduleError::Asymmetric {
                    team: team.clone(),
                    opponent: week.opponent.clone(),
                    week: week.week,
                    reason,
                };

                if counterpart.away == week.away {
                    return Err(asymmetric("both sides have the same home/away flag"));
                }
                if counterpart.result != week.result.map(WeekResult::inverse) {
                    return Err(asymmetric("results are not inverted"));
                }
                if counterpart.home_score != week.home_score
                    || counterpart.away_score != week.away_score
                {
                    return Err(asymmetric("scores differ"));
                }
            }
        }
        Ok(())
    }
}
