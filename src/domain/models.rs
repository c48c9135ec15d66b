use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One game from the ordered game feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_id: String,
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub is_neutral_site: bool,
    #[serde(default)]
    pub opening_spread: Option<f64>,
    #[serde(default)]
    pub closing_spread: Option<f64>,
    /// Feed found no betting market for this game at all
    #[serde(default)]
    pub no_market: bool,
}

impl GameRecord {
    pub fn usable_closing_spread(&self) -> Option<f64> {
        self.closing_spread.filter(|s| s.is_finite())
    }

    /// Opening-to-closing movement, home perspective
    pub fn line_movement(&self) -> Option<f64> {
        match (self.opening_spread, self.closing_spread) {
            (Some(open), Some(close)) => Some(close - open),
            _ => None,
        }
    }
}

/// Preseason composite rating for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialRating {
    pub team_name: String,
    #[serde(default)]
    pub conference: String,
    pub initial_rating: f64,
}

/// Externally maintained `source name -> canonical name` map
pub type NameOverrides = HashMap<String, String>;

/// A seeded team as listed in a bracket seeding file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEntry {
    pub team_name: String,
    pub seed: u32,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feed_record_with_missing_lines() {
        let json = r#"{"gameId":"g1","date":"2024-11-04","homeTeam":"Duke","awayTeam":"Army"}"#;
        let game: GameRecord = serde_json::from_str(json).unwrap();

        assert!(!game.is_neutral_site);
        assert!(!game.no_market);
        assert_eq!(game.usable_closing_spread(), None);
    }

    #[test]
    fn non_finite_closing_line_is_unusable() {
        let game = GameRecord {
            game_id: "g2".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            is_neutral_site: false,
            opening_spread: Some(-3.0),
            closing_spread: Some(f64::NAN),
            no_market: false,
        };

        assert_eq!(game.usable_closing_spread(), None);
    }

    #[test]
    fn movement_is_close_minus_open() {
        let json = r#"{"gameId":"g3","date":"2024-11-06","homeTeam":"A","awayTeam":"B","openingSpread":-3.0,"closingSpread":-4.5}"#;
        let game: GameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(game.line_movement(), Some(-1.5));
    }

    #[test]
    fn parses_no_market_flag() {
        let json = r#"{"gameId":"g4","date":"2024-11-07","homeTeam":"A","awayTeam":"B","noMarket":true}"#;
        let game: GameRecord = serde_json::from_str(json).unwrap();
        assert!(game.no_market);
    }
}
