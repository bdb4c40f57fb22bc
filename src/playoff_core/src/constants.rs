/// Regular season games per team (excluding the bye week)
pub const REGULAR_SEASON_GAMES: u32 = 17;

/// Wildcard berths per conference
pub const WILDCARD_SPOTS: usize = 3;

/// Division winners per conference
pub const DIVISIONS_PER_CONFERENCE: usize = 4;

/// Playoff teams per conference (division winners plus wildcards)
pub const CONFERENCE_PLAYOFF_TEAMS: usize = DIVISIONS_PER_CONFERENCE + WILDCARD_SPOTS;

/// Shared opponents required before the common-games tiebreaker applies
pub const COMMON_OPPONENT_MINIMUM: usize = 4;

/// Largest outcome space that is enumerated exhaustively
pub const MAX_EXHAUSTIVE_OUTCOMES: u64 = 40_000;

/// Random outcomes drawn when the outcome space is too large to enumerate
pub const SAMPLED_OUTCOMES: u64 = 40_000;

/// Rating assumed for a team missing from a ratings snapshot
pub const INITIAL_ELO: f64 = 1500.0;

/// Rating points per tenfold change in win odds
pub const ELO_SCALE: f64 = 400.0;
