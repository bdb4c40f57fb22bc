//! Playoff Core - NFL playoff seeding, clinch analysis and playoff odds.
//!
//! This library applies the league's tie-break rules to a partial or complete
//! season schedule, with optional Python bindings via PyO3.

pub mod clinch;
pub mod config;
pub mod constants;
pub mod error;
pub mod league;
pub mod overrides;
pub mod probability;
pub mod records;
pub mod schedule;
pub mod season;
pub mod seeding;
pub mod team;
pub mod tiebreak;
pub mod win_prob;

#[cfg(feature = "python")]
mod python;

#[cfg(test)]
mod test_support;

pub use clinch::{can_tie, is_clinched, is_eliminated};
pub use config::{SeasonRules, SimulationConfig};
pub use error::{OverridesError, ScheduleError, TiebreakError};
pub use league::League;
pub use overrides::OverridesMap;
pub use probability::{
    calculate_playoff_probability, undecided_matchups, OutcomeMethod, PlayoffProbabilities,
    UndecidedMatchup,
};
pub use records::{get_records, TeamRecord, WinLoss};
pub use schedule::{Schedule, ScheduleWeek, WeekResult};
pub use season::SeasonState;
pub use seeding::{get_seeding, league_playoff_teams, ConferenceSeeding, Seeding};
pub use team::{Conference, Division, Team};
pub use tiebreak::{break_division_tie, break_wildcard_tie, TiebreakKind, TiebreakResult};
pub use win_prob::{calculate_probability, calculate_win_prob, EloRatings};
