pub mod spread;

pub use spread::{
    project_matchup, project_spread, round_spread, win_prob_from_spread, MatchupProjection,
    SPREAD_DECIMALS, WIN_PROB_K,
};
