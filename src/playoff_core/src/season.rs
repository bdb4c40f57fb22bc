use crate::config::SimulationConfig;
use crate::error::TiebreakError;
use crate::league::League;
use crate::overrides::OverridesMap;
use crate::probability::{calculate_playoff_probability, PlayoffProbabilities};
use crate::schedule::{Schedule, WeekResult};
use crate::seeding::{get_seeding, Seeding};
use crate::win_prob::EloRatings;

/// Season state containing schedule, ratings, and simulation settings.
#[derive(Clone, Debug)]
pub struct SeasonState {
    pub schedule: Schedule,

    /// Teams and season rules
    pub league: League,

    /// Elo ratings used to weight sampled outcomes
    pub ratings: Option<EloRatings>,

    /// Manual probability overrides
    pub overrides: OverridesMap,

    pub config: SimulationConfig,
}

impl SeasonState {
    pub fn new(schedule: Schedule, league: League) -> Self {
        SeasonState {
            schedule,
            league,
            ratings: None,
            overrides: OverridesMap::default(),
            config: SimulationConfig::default(),
        }
    }

    pub fn with_ratings(mut self, ratings: EloRatings) -> Self {
        self.ratings = Some(ratings);
        self
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Current seeding of both conferences.
    pub fn seeding(&self, include_eliminations: bool) -> Result<Seeding, TiebreakError> {
        get_seeding(&self.schedule, &self.league, include_eliminations)
    }

    /// Playoff odds over every unplayed game.
    pub fn playoff_probability(&self) -> PlayoffProbabilities {
        let overrides = if self.overrides.is_empty() {
            None
        } else {
            Some(&self.overrides)
        };
        calculate_playoff_probability(
            &self.schedule,
            &self.league,
            self.ratings.as_ref(),
            overrides,
            &self.config,
        )
    }

    /// Games a team has left under the league's season length.
    pub fn remaining_games(&self, code: &str) -> u32 {
        self.league
            .rules()
            .regular_season_games
            .saturating_sub(self.schedule.games_played(code))
    }

    /// Create a modified copy with an override added
    pub fn with_override(&self, team1: &str, team2: &str, prob: f64) -> Self {
        let mut new_state = self.clone();
        new_state.overrides.add_override(team1, team2, prob);
        new_state
    }

    /// Create a modified copy with an unplayed game decided.
    ///
    /// The copy is unchanged if `home` has no unplayed home game against
    /// `away` in `week`.
    pub fn with_result(&self, week: u32, home: &str, away: &str, home_won: bool) -> Self {
        let mut new_state = self.clone();
        let is_unplayed = self.schedule.weeks(home).iter().any(|game| {
            game.week == week && game.opponent == away && !game.away && !game.is_decided()
        });
        if !is_unplayed {
            return new_state;
        }

        let home_result = if home_won {
            WeekResult::Win
        } else {
            WeekResult::Loss
        };
        new_state
            .schedule
            .set_result(week, home, away, home_result);
        new_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probability::OutcomeMethod;
    use crate::team::Conference;
    use crate::test_support::round_robin_season;

    fn state(undecided: usize) -> SeasonState {
        let league = League::nfl();
        let schedule = round_robin_season(&league, undecided);
        SeasonState::new(schedule, league)
    }

    #[test]
    fn test_remaining_games() {
        let state = state(2);
        // BAL plays 15 conference games, one of them unplayed.
        assert_eq!(state.remaining_games("BAL"), 3);
        assert_eq!(state.remaining_games("BUF"), 4);
        assert_eq!(state.remaining_games("ARI"), 2);
    }

    #[test]
    fn test_with_result_decides_one_game() {
        let state = state(1);
        assert_eq!(
            state.playoff_probability().method,
            OutcomeMethod::Exhaustive
        );

        // BAL-BUF is the only unplayed game and BUF is at home.
        let decided = state.with_result(1, "BUF", "BAL", true);
        assert!(decided.schedule.undecided().teams().all(|(_, weeks)| weeks.is_empty()));
        assert_eq!(decided.schedule.games_played("BAL"), 15);
        assert_eq!(state.schedule.games_played("BAL"), 14);

        let unchanged = state.with_result(1, "BAL", "BUF", true);
        assert_eq!(unchanged.schedule.games_played("BAL"), 14);
    }

    #[test]
    fn test_what_if_changes_seeding() {
        let state = state(1);
        let buf_wins = state.with_result(1, "BUF", "BAL", true);
        let bal_wins = state.with_result(1, "BUF", "BAL", false);

        let buf_first = buf_wins.seeding(false).unwrap();
        let bal_first = bal_wins.seeding(false).unwrap();
        assert_eq!(buf_first.afc.seeding()[0], "BUF");
        assert_eq!(bal_first.afc.seeding()[0], "BAL");
        assert_eq!(buf_first.nfc, bal_first.nfc);
    }

    #[test]
    fn test_override_shifts_probability() {
        let state = state(1).with_override("BUF", "BAL", 1.0);
        let config = SimulationConfig {
            max_exhaustive_outcomes: 1,
            samples: 20,
            seed: Some(9),
            parallel: false,
        };
        let result = state.with_config(config).playoff_probability();

        assert_eq!(result.method, OutcomeMethod::Sampled);
        assert_eq!(result.probability("BUF"), 100.0);
        assert_eq!(result.probability("BAL"), 100.0);
        let league = League::nfl();
        let certain = league
            .conference_teams(Conference::Afc)
            .iter()
            .filter(|team| result.probability(&team.code) == 100.0)
            .count();
        assert_eq!(certain, 7);
    }
}
