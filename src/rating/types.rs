use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRating {
    pub team_name: String,
    pub conference: String,
    pub rating: f64,
    /// Set once at bootstrap
    pub initial_rating: f64,
    pub games_processed: u32,
}

/// One ledger record. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAdjustment {
    pub game_id: String,
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_rating_before: f64,
    pub home_rating_after: f64,
    pub away_rating_before: f64,
    pub away_rating_after: f64,
    /// Home perspective, negative = home favored
    pub projected_spread: f64,
    pub closing_spread: Option<f64>,
    /// Opening to closing line movement, informational only
    #[serde(default)]
    pub line_movement: Option<f64>,
    pub is_neutral_site: bool,
}

impl GameAdjustment {
    pub fn involves(&self, team_name: &str) -> bool {
        self.home_team == team_name || self.away_team == team_name
    }

    /// Rating the given team carried out of this game
    pub fn rating_after(&self, team_name: &str) -> Option<f64> {
        if self.home_team == team_name {
            Some(self.home_rating_after)
        } else if self.away_team == team_name {
            Some(self.away_rating_after)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsSnapshot {
    pub ratings: Vec<TeamRating>,
    pub adjustments: Vec<GameAdjustment>,
    pub games_processed: usize,
}

impl RatingsSnapshot {
    pub fn find(&self, team_name: &str) -> Option<&TeamRating> {
        self.ratings.iter().find(|r| r.team_name == team_name)
    }
}
