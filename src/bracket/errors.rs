use thiserror::Error;

/// Malformed template graph. Raised when a template is registered, never
/// while projecting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("template {0} is already registered")]
    DuplicateTemplate(String),
    #[error("template {template}: no rounds defined")]
    Empty { template: String },
    #[error("template {template}: round {round} has no matchups")]
    EmptyRound { template: String, round: u32 },
    #[error("template {template}: round {round} does not follow round {previous}")]
    RoundOrder {
        template: String,
        round: u32,
        previous: u32,
    },
    #[error("template {template}: duplicate matchup id {matchup}")]
    DuplicateMatchup { template: String, matchup: String },
    #[error("template {template}: seed {seed} is outside 1..={team_count}")]
    SeedOutOfRange {
        template: String,
        seed: u32,
        team_count: u32,
    },
    #[error("template {template}: seed {seed} is used more than once")]
    DuplicateSeed { template: String, seed: u32 },
    #[error("template {template}: seed {seed} is never placed")]
    MissingSeed { template: String, seed: u32 },
    #[error("template {template}: {matchup} is fed by unknown matchup {source_id}")]
    UnknownSource {
        template: String,
        matchup: String,
        source_id: String,
    },
    #[error("template {template}: {matchup} is fed by {source_id} which is not in an earlier round")]
    SourceNotEarlier {
        template: String,
        matchup: String,
        source_id: String,
    },
    #[error("template {template}: winner of {source_id} feeds more than one slot")]
    SourceReused { template: String, source_id: String },
    #[error("template {template}: expected exactly one final matchup, found {finals}")]
    FinalCount { template: String, finals: usize },
    #[error("template {template}: cycle through matchup {matchup}")]
    Cycle { template: String, matchup: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BracketError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("unknown bracket template: {0}")]
    UnknownTemplate(String),
    #[error("unknown matchup: {0}")]
    UnknownMatchup(String),
    #[error("matchup {matchup} has no {side} team yet")]
    SideNotReady { matchup: String, side: String },
    #[error("matchup {0} is still waiting on an opponent")]
    MatchupPending(String),
    #[error("seed {0} is assigned to more than one team")]
    DuplicateTeamSeed(u32),
    #[error("seed {seed} is outside 1..={team_count} for this template")]
    TeamSeedOutOfRange { seed: u32, team_count: u32 },
}
