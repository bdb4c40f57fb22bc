use thiserror::Error;

/// The tie-break engine ran out of criteria.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TiebreakError {
    #[error("failed to break tie between: {}", .teams.join(","))]
    Unresolved { teams: Vec<String> },
}

impl TiebreakError {
    pub fn teams(&self) -> &[String] {
        match self {
            TiebreakError::Unresolved { teams } => teams,
        }
    }
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown team: {name}")]
    UnknownTeam { name: String },

    #[error("{team} lists {opponent} in week {week} but {opponent} has no matching game")]
    MissingCounterpart {
        team: String,
        opponent: String,
        week: u32,
    },

    #[error("Week {week} between {team} and {opponent} is not symmetric: {reason}")]
    Asymmetric {
        team: String,
        opponent: String,
        week: u32,
        reason: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum OverridesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid probability on line {line}: {value}")]
    InvalidProbability { line: usize, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_message_names_teams() {
        let err = TiebreakError::Unresolved {
            teams: vec!["BUF".to_string(), "MIA".to_string()],
        };
        assert_eq!(err.to_string(), "failed to break tie between: BUF,MIA");
        assert_eq!(err.teams(), ["BUF", "MIA"]);
    }
}
