use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::DIVISIONS_PER_CONFERENCE;

/// Top-level grouping of the league.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Conference {
    #[serde(rename = "AFC")]
    Afc,
    #[serde(rename = "NFC")]
    Nfc,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::Afc, Conference::Nfc];

    /// Divisions of this conference in the order division winners are first compared.
    pub fn divisions(self) -> [Division; DIVISIONS_PER_CONFERENCE] {
        match self {
            Conference::Afc => [
                Division::AfcNorth,
                Division::AfcSouth,
                Division::AfcEast,
                Division::AfcWest,
            ],
            Conference::Nfc => [
                Division::NfcNorth,
                Division::NfcSouth,
                Division::NfcEast,
                Division::NfcWest,
            ],
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conference::Afc => write!(f, "AFC"),
            Conference::Nfc => write!(f, "NFC"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Division {
    #[serde(rename = "AFC North")]
    AfcNorth,
    #[serde(rename = "AFC South")]
    AfcSouth,
    #[serde(rename = "AFC East")]
    AfcEast,
    #[serde(rename = "AFC West")]
    AfcWest,
    #[serde(rename = "NFC North")]
    NfcNorth,
    #[serde(rename = "NFC South")]
    NfcSouth,
    #[serde(rename = "NFC East")]
    NfcEast,
    #[serde(rename = "NFC West")]
    NfcWest,
}

impl Division {
    pub fn conference(self) -> Conference {
        match self {
            Division::AfcNorth | Division::AfcSouth | Division::AfcEast | Division::AfcWest => {
                Conference::Afc
            }
            Division::NfcNorth | Division::NfcSouth | Division::NfcEast | Division::NfcWest => {
                Conference::Nfc
            }
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Division::AfcNorth => "AFC North",
            Division::AfcSouth => "AFC South",
            Division::AfcEast => "AFC East",
            Division::AfcWest => "AFC West",
            Division::NfcNorth => "NFC North",
            Division::NfcSouth => "NFC South",
            Division::NfcEast => "NFC East",
            Division::NfcWest => "NFC West",
        };
        write!(f, "{}", name)
    }
}

/// Immutable team identity. The conference is implied by the division.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub name: String,

    /// Short code used as the key everywhere else (e.g. "KC")
    pub code: String,

    pub division: Division,
}

impl Team {
    pub fn new(name: impl Into<String>, code: impl Into<String>, division: Division) -> Self {
        Team {
            name: name.into(),
            code: code.into(),
            division,
        }
    }

    pub fn conference(&self) -> Conference {
        self.division.conference()
    }

    /// Last word of the full name ("Kansas City Chiefs" -> "Chiefs")
    pub fn nickname(&self) -> &str {
        self.name.rsplit(' ').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.code, self.division)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_division_implies_conference() {
        for conference in Conference::ALL {
            for division in conference.divisions() {
                assert_eq!(division.conference(), conference);
            }
        }
    }

    #[test]
    fn test_nickname() {
        let team = Team::new("Kansas City Chiefs", "KC", Division::AfcWest);
        assert_eq!(team.nickname(), "Chiefs");
        assert_eq!(team.conference(), Conference::Afc);
    }

    #[test]
    fn test_division_serde_names() {
        let json = serde_json::to_string(&Division::NfcEast).unwrap();
        assert_eq!(json, "\"NFC East\"");
        let parsed: Conference = serde_json::from_str("\"AFC\"").unwrap();
        assert_eq!(parsed, Conference::Afc);
    }
}
