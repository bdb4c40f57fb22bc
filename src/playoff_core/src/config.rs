//! Season rules and simulator settings.
//!
//! Both structs deserialize with every field optional; anything missing falls
//! back to the league constants.

use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_EXHAUSTIVE_OUTCOMES, REGULAR_SEASON_GAMES, SAMPLED_OUTCOMES, WILDCARD_SPOTS,
};
use crate::tiebreak::TiebreakKind;

/// Rules that vary between seasons or test leagues.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonRules {
    /// Games each team plays, used to derive remaining games
    pub regular_season_games: u32,

    /// Wildcard berths per conference
    pub wildcard_spots: usize,

    /// Criterion cascade used to order division winners against each other
    pub division_winner_tiebreak: TiebreakKind,
}

impl Default for SeasonRules {
    fn default() -> Self {
        SeasonRules {
            regular_season_games: REGULAR_SEASON_GAMES,
            wildcard_spots: WILDCARD_SPOTS,
            division_winner_tiebreak: TiebreakKind::Division,
        }
    }
}

impl SeasonRules {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Settings for the playoff probability simulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Enumerate every outcome when 2^games is at most this many
    pub max_exhaustive_outcomes: u64,

    /// Random outcomes drawn otherwise
    pub samples: u64,

    /// Base seed for sampling; `None` seeds from OS entropy
    pub seed: Option<u64>,

    /// Evaluate outcomes on the rayon pool
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            max_exhaustive_outcomes: MAX_EXHAUSTIVE_OUTCOMES,
            samples: SAMPLED_OUTCOMES,
            seed: None,
            parallel: true,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Copy of this config with a fixed sampling seed
    pub fn with_seed(&self, seed: u64) -> Self {
        SimulationConfig {
            seed: Some(seed),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let rules = SeasonRules::default();
        assert_eq!(rules.regular_season_games, 17);
        assert_eq!(rules.wildcard_spots, 3);
        assert_eq!(rules.division_winner_tiebreak, TiebreakKind::Division);

        let config = SimulationConfig::default();
        assert_eq!(config.max_exhaustive_outcomes, 40_000);
        assert_eq!(config.samples, 40_000);
        assert_eq!(config.seed, None);
        assert!(config.parallel);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json_str(r#"{"samples": 500, "seed": 7}"#).unwrap();
        assert_eq!(config.samples, 500);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_exhaustive_outcomes, 40_000);

        let rules =
            SeasonRules::from_json_str(r#"{"division_winner_tiebreak": "conference"}"#).unwrap();
        assert_eq!(rules.division_winner_tiebreak, TiebreakKind::Conference);
        assert_eq!(rules.regular_season_games, 17);
    }

    #[test]
    fn test_with_seed() {
        let config = SimulationConfig::default().with_seed(42);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.samples, SAMPLED_OUTCOMES);
    }
}
