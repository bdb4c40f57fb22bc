use std::collections::HashMap;

use crate::config::SeasonRules;
use crate::team::{Conference, Division, Team};

/// (full name, code, division) for every NFL team, in data-feed order.
const NFL_TEAMS: [(&str, &str, Division); 32] = [
    ("Arizona Cardinals", "ARI", Division::NfcWest),
    ("Atlanta Falcons", "ATL", Division::NfcSouth),
    ("Baltimore Ravens", "BAL", Division::AfcNorth),
    ("Buffalo Bills", "BUF", Division::AfcEast),
    ("Carolina Panthers", "CAR", Division::NfcSouth),
    ("Chicago Bears", "CHI", Division::NfcNorth),
    ("Cincinnati Bengals", "CIN", Division::AfcNorth),
    ("Cleveland Browns", "CLE", Division::AfcNorth),
    ("Dallas Cowboys", "DAL", Division::NfcEast),
    ("Denver Broncos", "DEN", Division::AfcWest),
    ("Detroit Lions", "DET", Division::NfcNorth),
    ("Green Bay Packers", "GB", Division::NfcNorth),
    ("Houston Texans", "HOU", Division::AfcSouth),
    ("Indianapolis Colts", "IND", Division::AfcSouth),
    ("Jacksonville Jaguars", "JAX", Division::AfcSouth),
    ("Kansas City Chiefs", "KC", Division::AfcWest),
    ("Las Vegas Raiders", "LV", Division::AfcWest),
    ("Los Angeles Rams", "LAR", Division::NfcWest),
    ("Los Angeles Chargers", "LAC", Division::AfcWest),
    ("Miami Dolphins", "MIA", Division::AfcEast),
    ("Minnesota Vikings", "MIN", Division::NfcNorth),
    ("New England Patriots", "NE", Division::AfcEast),
    ("New Orleans Saints", "NO", Division::NfcSouth),
    ("New York Giants", "NYG", Division::NfcEast),
    ("New York Jets", "NYJ", Division::AfcEast),
    ("Philadelphia Eagles", "PHI", Division::NfcEast),
    ("Pittsburgh Steelers", "PIT", Division::AfcNorth),
    ("San Francisco 49ers", "SF", Division::NfcWest),
    ("Seattle Seahawks", "SEA", Division::NfcWest),
    ("Tampa Bay Buccaneers", "TB", Division::NfcSouth),
    ("Tennessee Titans", "TEN", Division::AfcSouth),
    ("Washington Commanders", "WSH", Division::NfcEast),
];

/// Teams of a league plus the rules its season is played under.
///
/// Team order is significant: it is the order in which equal teams are handed
/// to the tie-break engine, so every ranking derived from a league is
/// deterministic.
#[derive(Clone, Debug)]
pub struct League {
    teams: Vec<Team>,
    index: HashMap<String, usize>,
    rules: SeasonRules,
}

impl League {
    pub fn new(teams: Vec<Team>, rules: SeasonRules) -> Self {
        let index = teams
            .iter()
            .enumerate()
            .map(|(i, team)| (team.code.clone(), i))
            .collect();
        League { teams, index, rules }
    }

    /// The 32-team NFL with default rules.
    pub fn nfl() -> Self {
        let teams = NFL_TEAMS
            .iter()
            .map(|&(name, code, division)| Team::new(name, code, division))
            .collect();
        League::new(teams, SeasonRules::default())
    }

    /// Create a copy of this league playing under different rules
    pub fn with_rules(&self, rules: SeasonRules) -> Self {
        League {
            teams: self.teams.clone(),
            index: self.index.clone(),
            rules,
        }
    }

    pub fn rules(&self) -> &SeasonRules {
        &self.rules
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, code: &str) -> Option<&Team> {
        self.index.get(code).map(|&i| &self.teams[i])
    }

    /// Look a team up by code or by full name.
    pub fn find(&self, name_or_code: &str) -> Option<&Team> {
        self.team(name_or_code)
            .or_else(|| self.teams.iter().find(|team| team.name == name_or_code))
    }

    pub fn division_of(&self, code: &str) -> Option<Division> {
        self.team(code).map(|team| team.division)
    }

    pub fn conference_of(&self, code: &str) -> Option<Conference> {
        self.team(code).map(|team| team.conference())
    }

    pub fn conference_teams(&self, conference: Conference) -> Vec<&Team> {
        self.teams
            .iter()
            .filter(|team| team.conference() == conference)
            .collect()
    }

    pub fn division_teams(&self, division: Division) -> Vec<&Team> {
        self.teams
            .iter()
            .filter(|team| team.division == division)
            .collect()
    }
}

impl Default for League {
    fn default() -> Self {
        League::nfl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfl_shape() {
        let league = League::nfl();
        assert_eq!(league.teams().len(), 32);

        for conference in Conference::ALL {
            assert_eq!(league.conference_teams(conference).len(), 16);
            for division in conference.divisions() {
                assert_eq!(league.division_teams(division).len(), 4, "{}", division);
            }
        }
    }

    #[test]
    fn test_lookup_by_code_and_name() {
        let league = League::nfl();
        assert_eq!(league.team("GB").unwrap().name, "Green Bay Packers");
        assert_eq!(league.find("Green Bay Packers").unwrap().code, "GB");
        assert_eq!(league.find("GB").unwrap().code, "GB");
        assert!(league.find("Nowhere Nobodies").is_none());
        assert_eq!(league.conference_of("BUF"), Some(Conference::Afc));
        assert_eq!(league.division_of("WSH"), Some(Division::NfcEast));
    }

    #[test]
    fn test_codes_are_unique() {
        let league = League::nfl();
        let mut codes: Vec<&str> = league.teams().iter().map(|t| t.code.as_str()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 32);
    }
}
