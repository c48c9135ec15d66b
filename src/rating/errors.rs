use thiserror::Error;

/// Per-game data problems. The game is skipped, the batch continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("team(s) not found: {}", .0.join(", "))]
    TeamNotFound(Vec<String>),
    #[error("no market odds for game")]
    NoOdds,
    #[error("no usable closing spread for game")]
    NoSpread,
    #[error("{0} is listed as both home and away team")]
    SameTeam(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatingError {
    #[error("rating store is already initialized")]
    AlreadyInitialized,
    #[error("duplicate team in initial ratings: {0}")]
    DuplicateTeam(String),
    #[error("game {0} is already in the ledger")]
    DuplicateGame(String),
    #[error("unknown team: {0}")]
    UnknownTeam(String),
    #[error("ledger replay diverged for {team}: expected {expected}, got {actual}")]
    Inconsistent {
        team: String,
        expected: f64,
        actual: f64,
    },
}
