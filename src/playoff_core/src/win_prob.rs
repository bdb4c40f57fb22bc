use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{ELO_SCALE, INITIAL_ELO};
use crate::overrides::OverridesMap;

/// Probability that a team rated `rating_a` beats one rated `rating_b`.
pub fn calculate_probability(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / ELO_SCALE))
}

/// Snapshot of current Elo ratings keyed by team code.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EloRatings {
    ratings: HashMap<String, f64>,
}

impl EloRatings {
    pub fn new() -> Self {
        EloRatings::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn set(&mut self, code: &str, rating: f64) {
        self.ratings.insert(code.to_string(), rating);
    }

    /// Rating of a team; unrated teams start at the initial rating.
    pub fn rating(&self, code: &str) -> f64 {
        self.ratings.get(code).copied().unwrap_or(INITIAL_ELO)
    }

    pub fn win_probability(&self, home: &str, away: &str) -> f64 {
        calculate_probability(self.rating(home), self.rating(away))
    }
}

impl FromIterator<(String, f64)> for EloRatings {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        EloRatings {
            ratings: iter.into_iter().collect(),
        }
    }
}

/// Probability of `home` beating `away` in a game still to be played.
///
/// A manual override wins over the ratings; with neither, the game is a
/// coin flip.
pub fn calculate_win_prob(
    home: &str,
    away: &str,
    ratings: Option<&EloRatings>,
    overrides: Option<&OverridesMap>,
) -> f64 {
    if let Some(prob) = overrides.and_then(|ovr| ovr.get(home, away)) {
        return prob;
    }

    match ratings {
        Some(ratings) => ratings.win_probability(home, away),
        None => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_ratings_are_even() {
        assert!((calculate_probability(1500.0, 1500.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_four_hundred_points_is_ten_to_one() {
        let p = calculate_probability(1900.0, 1500.0);
        assert!((p - 10.0 / 11.0).abs() < 1e-12);
        assert!((calculate_probability(1500.0, 1900.0) + p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_probability_increases_with_rating_gap() {
        let mut last = 0.0;
        for gap in [-300.0, -100.0, 0.0, 50.0, 250.0] {
            let p = calculate_probability(1500.0 + gap, 1500.0);
            assert!(p > last && p < 1.0);
            last = p;
        }
    }

    #[test]
    fn test_unrated_team_uses_initial_rating() {
        let ratings: EloRatings = [("KC".to_string(), 1700.0)].into_iter().collect();
        assert_eq!(ratings.rating("KC"), 1700.0);
        assert_eq!(ratings.rating("CAR"), INITIAL_ELO);
        assert!(ratings.win_probability("KC", "CAR") > 0.5);
    }

    #[test]
    fn test_ratings_from_json() {
        let ratings = EloRatings::from_json_str(r#"{"BUF": 1620.5, "NYJ": 1410}"#).unwrap();
        assert_eq!(ratings.rating("BUF"), 1620.5);
        assert_eq!(ratings.rating("NYJ"), 1410.0);
    }

    #[test]
    fn test_override_takes_precedence() {
        let mut ratings = EloRatings::new();
        ratings.set("KC", 1800.0);
        let mut overrides = OverridesMap::new();
        overrides.add_override("DEN", "KC", 0.6);

        assert_eq!(calculate_win_prob("DEN", "KC", Some(&ratings), Some(&overrides)), 0.6);
        assert!(calculate_win_prob("DEN", "KC", Some(&ratings), None) < 0.5);
        assert_eq!(calculate_win_prob("DEN", "KC", None, None), 0.5);
    }
}
