use serde::{Deserialize, Serialize};

/// Decimal places every projected spread is rounded to
pub const SPREAD_DECIMALS: i32 = 2;

/// Logistic calibration: points of spread -> win probability
pub const WIN_PROB_K: f64 = 0.17;

// exp() saturates to 0/inf outside this range and the probability would hit 0 or 1
const MAX_LOGISTIC_EXPONENT: f64 = 30.0;

/// Projected spread from the home side's perspective.
///
/// Negative means home is favored by `|spread|`. Neutral sites drop the
/// home advantage entirely.
pub fn project_spread(home_rating: f64, away_rating: f64, hca: f64, neutral: bool) -> f64 {
    let advantage = if neutral { 0.0 } else { hca };
    round_spread(-((home_rating - away_rating) + advantage))
}

/// Probability that the side favored by a negative spread wins
pub fn win_prob_from_spread(spread: f64) -> f64 {
    let exponent = (WIN_PROB_K * spread).clamp(-MAX_LOGISTIC_EXPONENT, MAX_LOGISTIC_EXPONENT);
    1.0 / (1.0 + exponent.exp())
}

pub fn round_spread(spread: f64) -> f64 {
    let scale = 10f64.powi(SPREAD_DECIMALS);
    // adding 0.0 turns -0.0 into 0.0
    (spread * scale).round() / scale + 0.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupProjection {
    pub spread: f64,
    pub home_win_prob: f64,
}

pub fn project_matchup(
    home_rating: f64,
    away_rating: f64,
    hca: f64,
    neutral: bool,
) -> MatchupProjection {
    let spread = project_spread(home_rating, away_rating, hca, neutral);
    MatchupProjection {
        spread,
        home_win_prob: win_prob_from_spread(spread),
    }
}
