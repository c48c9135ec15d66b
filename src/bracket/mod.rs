pub mod builder;
pub mod errors;
pub mod instance;
pub mod odds;
pub mod projector;
pub mod registry;
pub mod templates;
pub mod types;

pub use builder::build_matchups;
pub use errors::{BracketError, TemplateError};
pub use instance::BracketConfig;
pub use odds::{advancement_odds, BracketOdds, TeamOdds};
pub use projector::{
    downstream_of, invalidate_downstream, project_all, reset_projections, toggle_winner,
};
pub use registry::{validate_template, TemplateRegistry};
pub use types::{
    BracketMatchup, BracketTeam, BracketTemplate, MatchupSlot, MatchupState, Side, SlotSource,
    TemplateRound,
};
