use serde::{Deserialize, Serialize};

use super::builder::build_matchups;
use super::errors::BracketError;
use super::odds::{advancement_odds, BracketOdds};
use super::projector::{project_all, reset_projections, toggle_winner};
use super::registry::TemplateRegistry;
use super::types::{BracketMatchup, BracketTeam, Side};

/// One tournament instance: the seeded field and its projected matchups.
///
/// Mutated only through `toggle_winner` and `reset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketConfig {
    pub template_id: String,
    pub home_advantage: f64,
    pub teams: Vec<BracketTeam>,
    pub matchups: Vec<BracketMatchup>,
}

impl BracketConfig {
    pub fn build(
        registry: &TemplateRegistry,
        template_id: &str,
        mut teams: Vec<BracketTeam>,
        home_advantage: f64,
    ) -> Result<Self, BracketError> {
        let template = registry.get(template_id)?;
        let mut matchups = build_matchups(template, &teams)?;
        project_all(&mut matchups, home_advantage);
        teams.sort_by_key(|t| t.seed);

        Ok(Self {
            template_id: template_id.to_string(),
            home_advantage,
            teams,
            matchups,
        })
    }

    pub fn toggle_winner(&mut self, matchup_id: &str, side: Side) -> Result<(), BracketError> {
        toggle_winner(&mut self.matchups, matchup_id, side, self.home_advantage)
    }

    pub fn reset(&mut self) {
        reset_projections(&mut self.matchups, self.home_advantage);
    }

    pub fn matchup(&self, matchup_id: &str) -> Option<&BracketMatchup> {
        self.matchups.iter().find(|m| m.id == matchup_id)
    }

    /// Projected winner of the last round
    pub fn champion(&self) -> Option<&BracketTeam> {
        self.matchups
            .iter()
            .max_by_key(|m| (m.round, m.position))
            .and_then(BracketMatchup::winner_team)
    }

    pub fn odds(&self) -> BracketOdds {
        advancement_odds(&self.matchups, self.home_advantage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams() -> Vec<BracketTeam> {
        [("Gonzaga", 4, 18.5), ("Houston", 1, 24.0), ("Baylor", 3, 19.0), ("Purdue", 2, 22.0)]
            .into_iter()
            .map(|(name, seed, rating)| BracketTeam {
                team_name: name.to_string(),
                seed,
                rating,
                conference: String::new(),
                logo_url: None,
            })
            .collect()
    }

    #[test]
    fn build_projects_immediately() {
        let registry = TemplateRegistry::builtin().unwrap();
        let bracket = BracketConfig::build(&registry, "standard-4", teams(), 3.0).unwrap();

        assert_eq!(bracket.teams[0].team_name, "Houston");
        assert_eq!(bracket.champion().unwrap().team_name, "Houston");
    }

    #[test]
    fn toggle_and_reset_round_trip() {
        let registry = TemplateRegistry::builtin().unwrap();
        let mut bracket = BracketConfig::build(&registry, "standard-4", teams(), 3.0).unwrap();
        let original = bracket.clone();

        bracket.toggle_winner("R2-G1", Side::Bottom).unwrap();
        assert_eq!(bracket.champion().unwrap().team_name, "Purdue");

        bracket.reset();
        assert_eq!(bracket, original);
    }

    #[test]
    fn unknown_template_fails() {
        let registry = TemplateRegistry::builtin().unwrap();
        assert!(matches!(
            BracketConfig::build(&registry, "double-elim", teams(), 3.0),
            Err(BracketError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn serializes_for_export() {
        let registry = TemplateRegistry::builtin().unwrap();
        let bracket = BracketConfig::build(&registry, "standard-4", teams(), 3.0).unwrap();

        let json = serde_json::to_value(&bracket).unwrap();
        assert_eq!(json["templateId"], "standard-4");
        assert_eq!(json["matchups"][0]["sourceMatchupIds"], serde_json::json!([null, null]));
        assert_eq!(json["matchups"][2]["winner"], "top");
    }
}
