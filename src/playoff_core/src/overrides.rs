use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

use crate::error::OverridesError;

/// Manual win probabilities for specific matchups.
///
/// Overrides are stored with team codes in lexicographic order.
/// When retrieving an override, the probability is automatically
/// flipped if the teams are provided in reverse order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverridesMap {
    overrides: HashMap<(String, String), f64>,
}

fn key(team1: &str, team2: &str) -> ((String, String), bool) {
    if team1 < team2 {
        ((team1.to_string(), team2.to_string()), false)
    } else {
        ((team2.to_string(), team1.to_string()), true)
    }
}

impl OverridesMap {
    pub fn new() -> Self {
        OverridesMap {
            overrides: HashMap::new(),
        }
    }

    /// Read overrides from a CSV file.
    /// Format: team1,team2,probability
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OverridesError> {
        let mut overrides = OverridesMap::new();
        overrides.read_from_file(path)?;
        Ok(overrides)
    }

    /// Merge overrides from a CSV file into this map.
    ///
    /// Blank lines and lines without exactly three fields are skipped; an
    /// unparsable or out-of-range probability is an error.
    pub fn read_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), OverridesError> {
        let file = File::open(path)?;
        self.read_from(BufReader::new(file))
    }

    pub fn read_from<R: BufRead>(&mut self, reader: R) -> Result<(), OverridesError> {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let parts: Vec<&str> = line.split(',').collect();
            if parts.len() != 3 {
                warn!(line = index + 1, content = line, "skipping malformed override");
                continue;
            }

            let value = parts[2].trim();
            let prob: f64 = value
                .parse()
                .ok()
                .filter(|p: &f64| (0.0..=1.0).contains(p))
                .ok_or_else(|| OverridesError::InvalidProbability {
                    line: index + 1,
                    value: value.to_string(),
                })?;

            self.add_override(parts[0].trim(), parts[1].trim(), prob);
        }

        Ok(())
    }

    /// Add or update an override for a matchup.
    pub fn add_override(&mut self, team1: &str, team2: &str, prob: f64) {
        let (key, flip) = key(team1, team2);
        self.overrides.insert(key, if flip { 1.0 - prob } else { prob });
    }

    /// Remove an override for a matchup.
    pub fn remove_override(&mut self, team1: &str, team2: &str) {
        self.overrides.remove(&key(team1, team2).0);
    }

    /// Probability of `team1` beating `team2`, if overridden.
    pub fn get(&self, team1: &str, team2: &str) -> Option<f64> {
        let (key, flip) = key(team1, team2);
        self.overrides
            .get(&key)
            .map(|&p| if flip { 1.0 - p } else { p })
    }

    pub fn has_override(&self, team1: &str, team2: &str) -> bool {
        self.overrides.contains_key(&key(team1, team2).0)
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_flips_reversed_pair() {
        let mut overrides = OverridesMap::new();
        overrides.add_override("KC", "BUF", 0.7);

        assert!(overrides.has_override("BUF", "KC"));
        assert!((overrides.get("KC", "BUF").unwrap() - 0.7).abs() < 1e-12);
        assert!((overrides.get("BUF", "KC").unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(overrides.get("KC", "DEN"), None);

        overrides.remove_override("BUF", "KC");
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_read_skips_blank_and_malformed_lines() {
        let csv = "KC,BUF,0.6\n\nDEN,LV\nPHI, DAL , 0.25\n";
        let mut overrides = OverridesMap::new();
        overrides.read_from(csv.as_bytes()).unwrap();

        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get("PHI", "DAL"), Some(0.25));
    }

    #[test]
    fn test_read_rejects_bad_probability() {
        let mut overrides = OverridesMap::new();
        let err = overrides.read_from("KC,BUF,likely\n".as_bytes()).unwrap_err();
        assert!(matches!(err, OverridesError::InvalidProbability { line: 1, .. }));

        let err = overrides.read_from("\nKC,BUF,1.5\n".as_bytes()).unwrap_err();
        assert!(matches!(err, OverridesError::InvalidProbability { line: 2, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = OverridesMap::from_file("/nonexistent/overrides.csv").unwrap_err();
        assert!(matches!(err, OverridesError::Io(_)));
    }
}
