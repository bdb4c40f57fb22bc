//! Playoff odds from every way the unplayed games can finish.
//!
//! Small outcome spaces are enumerated outright. Larger ones are sampled,
//! each sample drawing from its own ChaCha8 stream seeded from the base seed
//! plus the sample index, so a seeded run gives the same answer on any
//! number of threads.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::error::TiebreakError;
use crate::league::League;
use crate::overrides::OverridesMap;
use crate::schedule::Schedule;
use crate::seeding::league_playoff_teams;
use crate::win_prob::{calculate_win_prob, EloRatings};

/// A game still to be played, seen from the home side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UndecidedMatchup {
    pub week: u32,
    pub home: String,
    pub away: String,
}

/// Unplayed games, one per home team entry so no game is counted twice.
pub fn undecided_matchups(schedule: &Schedule) -> Vec<UndecidedMatchup> {
    schedule
        .teams()
        .flat_map(|(code, weeks)| {
            weeks
                .iter()
                .filter(|week| !week.is_decided() && !week.away)
                .map(move |week| UndecidedMatchup {
                    week: week.week,
                    home: code.to_string(),
                    away: week.opponent.clone(),
                })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeMethod {
    Exhaustive,
    Sampled,
}

/// How many outcomes a run over `games` unplayed games evaluates.
pub fn plan_outcomes(games: usize, config: &SimulationConfig) -> (OutcomeMethod, u64) {
    match 1u64.checked_shl(games as u32) {
        Some(outcomes) if games < 64 && outcomes <= config.max_exhaustive_outcomes => {
            (OutcomeMethod::Exhaustive, outcomes)
        }
        _ => (OutcomeMethod::Sampled, config.samples),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayoffProbabilities {
    pub method: OutcomeMethod,
    pub outcomes_tested: u64,

    /// Outcomes discarded because a tie could not be broken
    pub failures: u64,

    pub occurrences: BTreeMap<String, u64>,

    /// Percentage in [0, 100] for every team of the league
    pub probabilities: BTreeMap<String, f64>,
}

impl PlayoffProbabilities {
    /// Outcomes that produced a seeding.
    pub fn simulations(&self) -> u64 {
        self.outcomes_tested.saturating_sub(self.failures)
    }

    pub fn probability(&self, code: &str) -> f64 {
        self.probabilities.get(code).copied().unwrap_or(0.0)
    }

    pub fn occurrences(&self, code: &str) -> u64 {
        self.occurrences.get(code).copied().unwrap_or(0)
    }

    /// Half-width in percentage points of the normal-approximation
    /// confidence interval of a sampled estimate.
    ///
    /// `None` for exhaustive runs, which are exact.
    pub fn margin_of_error(&self, code: &str, confidence: f64) -> Option<f64> {
        if self.method == OutcomeMethod::Exhaustive
            || self.simulations() == 0
            || !(0.0..1.0).contains(&confidence)
        {
            return None;
        }

        let normal = Normal::new(0.0, 1.0).ok()?;
        let z = normal.inverse_cdf(0.5 + confidence / 2.0);
        let p = self.probability(code) / 100.0;
        Some(z * (p * (1.0 - p) / self.simulations() as f64).sqrt() * 100.0)
    }
}

/// Per-shard playoff counts, merged once every outcome has been evaluated.
#[derive(Default)]
struct Tally {
    occurrences: HashMap<String, u64>,
    failures: u64,
}

impl Tally {
    fn record(mut self, result: Result<Vec<String>, TiebreakError>) -> Self {
        match result {
            Ok(teams) => {
                for team in teams {
                    *self.occurrences.entry(team).or_insert(0) += 1;
                }
            }
            Err(_) => self.failures += 1,
        }
        self
    }

    fn merge(mut self, other: Tally) -> Self {
        for (team, count) in other.occurrences {
            *self.occurrences.entry(team).or_insert(0) += count;
        }
        self.failures += other.failures;
        self
    }
}

/// Decided games plus one hypothetical result for every matchup.
fn outcome_schedule<F>(decided: &Schedule, matchups: &[UndecidedMatchup], home_won: F) -> Schedule
where
    F: Fn(usize) -> bool,
{
    let mut schedule = decided.clone();
    for (j, matchup) in matchups.iter().enumerate() {
        schedule.add_result(matchup.week, &matchup.home, &matchup.away, home_won(j));
    }
    schedule
}

/// Chance of each team making the playoffs, in percent.
///
/// Home teams of sampled games win with the override probability when one
/// exists, else the Elo probability when ratings are given, else 0.5.
/// Outcomes whose seeding hits an unbreakable tie are left out of both the
/// counts and the denominator.
pub fn calculate_playoff_probability(
    schedule: &Schedule,
    league: &League,
    ratings: Option<&EloRatings>,
    overrides: Option<&OverridesMap>,
    config: &SimulationConfig,
) -> PlayoffProbabilities {
    let decided = schedule.decided();
    let matchups = undecided_matchups(schedule);
    let (method, outcomes) = plan_outcomes(matchups.len(), config);

    info!(
        ?method,
        outcomes,
        remaining_games = matchups.len(),
        "computing playoff probabilities"
    );

    let evaluate: Box<dyn Fn(u64) -> Result<Vec<String>, TiebreakError> + Sync + '_> = match method {
        OutcomeMethod::Exhaustive => Box::new(|index: u64| {
            let outcome = outcome_schedule(&decided, &matchups, |j| (index >> j) & 1 == 1);
            league_playoff_teams(&outcome, league)
        }),
        OutcomeMethod::Sampled => {
            let home_probabilities: Vec<f64> = matchups
                .iter()
                .map(|matchup| calculate_win_prob(&matchup.home, &matchup.away, ratings, overrides))
                .collect();
            let base_seed = match config.seed {
                Some(seed) => seed,
                None => ChaCha8Rng::from_entropy().gen(),
            };
            Box::new(move |index: u64| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(index));
                let rolls: Vec<bool> = home_probabilities
                    .iter()
                    .map(|&p| rng.gen::<f64>() < p)
                    .collect();
                let outcome = outcome_schedule(&decided, &matchups, |j| rolls[j]);
                league_playoff_teams(&outcome, league)
            })
        }
    };

    let tally = if config.parallel {
        (0..outcomes)
            .into_par_iter()
            .fold(Tally::default, |tally, index| tally.record(evaluate(index)))
            .reduce(Tally::default, Tally::merge)
    } else {
        (0..outcomes).fold(Tally::default(), |tally, index| tally.record(evaluate(index)))
    };

    let simulations = outcomes.saturating_sub(tally.failures);
    if simulations == 0 {
        warn!(outcomes, "every outcome failed to seed; reporting zero for all teams");
    } else if tally.failures > 0 {
        info!(failures = tally.failures, "discarded outcomes with unbroken ties");
    }

    let mut occurrences = BTreeMap::new();
    let mut probabilities = BTreeMap::new();
    for team in league.teams() {
        let count = tally.occurrences.get(&team.code).copied().unwrap_or(0);
        let probability = if count == 0 || simulations == 0 {
            0.0
        } else {
            count as f64 / simulations as f64 * 100.0
        };
        occurrences.insert(team.code.clone(), count);
        probabilities.insert(team.code.clone(), probability);
    }

    PlayoffProbabilities {
        method,
        outcomes_tested: outcomes,
        failures: tally.failures,
        occurrences,
        probabilities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CONFERENCE_PLAYOFF_TEAMS;
    use crate::team::Conference;
    use crate::test_support::round_robin_season;

    fn sequential() -> SimulationConfig {
        SimulationConfig {
            parallel: false,
            ..SimulationConfig::default()
        }
    }

    fn sampled(samples: u64, seed: u64) -> SimulationConfig {
        SimulationConfig {
            max_exhaustive_outcomes: 16,
            samples,
            seed: Some(seed),
            parallel: true,
        }
    }

    #[test]
    fn test_only_home_games_are_matchups() {
        let league = League::nfl();
        let schedule = round_robin_season(&league, 10);
        let matchups = undecided_matchups(&schedule);

        assert_eq!(matchups.len(), 10);
        for matchup in &matchups {
            let week = schedule
                .weeks(&matchup.home)
                .iter()
                .find(|week| week.week == matchup.week)
                .unwrap();
            assert!(!week.away);
            assert_eq!(week.opponent, matchup.away);
        }
    }

    #[test]
    fn test_plan_outcomes() {
        let config = SimulationConfig::default();
        assert_eq!(plan_outcomes(0, &config), (OutcomeMethod::Exhaustive, 1));
        assert_eq!(plan_outcomes(10, &config), (OutcomeMethod::Exhaustive, 1024));
        assert_eq!(plan_outcomes(15, &config), (OutcomeMethod::Exhaustive, 32_768));
        assert_eq!(plan_outcomes(16, &config), (OutcomeMethod::Sampled, 40_000));
        assert_eq!(plan_outcomes(200, &config), (OutcomeMethod::Sampled, 40_000));
    }

    #[test]
    fn test_exhaustive_run_counts() {
        let league = League::nfl();
        let schedule = round_robin_season(&league, 10);
        let result = calculate_playoff_probability(
            &schedule,
            &league,
            None,
            None,
            &SimulationConfig::default(),
        );

        assert_eq!(result.method, OutcomeMethod::Exhaustive);
        assert_eq!(result.outcomes_tested, 1024);
        assert_eq!(result.probabilities.len(), 32);

        for conference in Conference::ALL {
            let total: u64 = league
                .conference_teams(conference)
                .iter()
                .map(|team| result.occurrences(&team.code))
                .sum();
            assert_eq!(total, CONFERENCE_PLAYOFF_TEAMS as u64 * result.simulations());
        }
        for (code, &probability) in &result.probabilities {
            assert!(result.occurrences(code) <= 1024);
            assert!((0.0..=100.0).contains(&probability));
        }

        // Every NFC game is decided.
        assert_eq!(result.probability("ARI"), 100.0);
        assert_eq!(result.probability("WSH"), 0.0);
        assert_eq!(result.margin_of_error("ARI", 0.95), None);
    }

    #[test]
    fn test_exhaustive_is_idempotent_and_thread_independent() {
        let league = League::nfl();
        let schedule = round_robin_season(&league, 8);

        let first =
            calculate_playoff_probability(&schedule, &league, None, None, &SimulationConfig::default());
        let second =
            calculate_playoff_probability(&schedule, &league, None, None, &SimulationConfig::default());
        let serial = calculate_playoff_probability(&schedule, &league, None, None, &sequential());

        assert_eq!(first, second);
        assert_eq!(first, serial);
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let league = League::nfl();
        let schedule = round_robin_season(&league, 10);
        let mut ratings = EloRatings::new();
        ratings.set("BAL", 1350.0);
        ratings.set("CIN", 1650.0);

        let config = sampled(300, 11);
        let first = calculate_playoff_probability(&schedule, &league, Some(&ratings), None, &config);
        let second = calculate_playoff_probability(&schedule, &league, Some(&ratings), None, &config);
        let serial = calculate_playoff_probability(
            &schedule,
            &league,
            Some(&ratings),
            None,
            &SimulationConfig {
                parallel: false,
                ..config.clone()
            },
        );

        assert_eq!(first.method, OutcomeMethod::Sampled);
        assert_eq!(first.outcomes_tested, 300);
        assert_eq!(first, second);
        assert_eq!(first, serial);
    }

    #[test]
    fn test_certain_overrides_fix_the_outcome() {
        let league = League::nfl();
        let schedule = round_robin_season(&league, 10);
        let matchups = undecided_matchups(&schedule);

        let mut overrides = OverridesMap::new();
        for matchup in &matchups {
            overrides.add_override(&matchup.home, &matchup.away, 1.0);
        }

        let result =
            calculate_playoff_probability(&schedule, &league, None, Some(&overrides), &sampled(50, 3));

        let forced = outcome_schedule(&schedule.decided(), &matchups, |_| true);
        let expected = league_playoff_teams(&forced, &league).unwrap();
        for team in league.teams() {
            let want = if expected.contains(&team.code) { 100.0 } else { 0.0 };
            assert_eq!(result.probability(&team.code), want, "{}", team.code);
            assert_eq!(result.margin_of_error(&team.code, 0.95), Some(0.0));
        }
    }

    #[test]
    fn test_sampling_agrees_with_enumeration() {
        let league = League::nfl();
        let schedule = round_robin_season(&league, 10);

        let exact =
            calculate_playoff_probability(&schedule, &league, None, None, &SimulationConfig::default());
        let estimate = calculate_playoff_probability(&schedule, &league, None, None, &sampled(10_000, 5));

        for team in league.teams() {
            let gap = (exact.probability(&team.code) - estimate.probability(&team.code)).abs();
            assert!(gap < 2.0, "{}: {}", team.code, gap);
        }
        let margin = estimate.margin_of_error("BAL", 0.95).unwrap();
        assert!(margin >= 0.0 && margin < 1.0);
    }

    #[test]
    fn test_all_outcomes_failing_reports_zero() {
        let league = League::nfl();
        let result =
            calculate_playoff_probability(&Schedule::new(), &league, None, None, &sequential());

        assert_eq!(result.outcomes_tested, 1);
        assert_eq!(result.failures, 1);
        assert!(result.probabilities.values().all(|&p| p == 0.0));
    }
}
