use anyhow::{bail, Result};
use colored::Colorize;
use log::info;

use crate::bracket::{
    BracketConfig, BracketMatchup, BracketTeam, BracketTemplate, MatchupState, Side,
    TemplateRegistry,
};
use crate::config::settings::AppConfig;
use crate::domain::{NameOverrides, SeedEntry};
use crate::exchange::DataDir;
use crate::matching::TeamNameMatcher;
use crate::rating::RatingsSnapshot;

/// Builds a bracket from the published ratings and the seeding file
pub struct BracketService {
    config: AppConfig,
    data: DataDir,
}

impl BracketService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let data = DataDir::new(&config.storage.data_dir)?;
        Ok(Self { config, data })
    }

    /// Built-in templates plus any from `templates.json`
    pub fn registry(&self) -> Result<TemplateRegistry> {
        let mut registry = TemplateRegistry::builtin()?;
        if let Some(custom) = self.data.load::<Vec<BracketTemplate>>(DataDir::TEMPLATES)? {
            info!("  → Registering {} custom templates", custom.len());
            for template in custom {
                registry.register(template)?;
            }
        }
        Ok(registry)
    }

    /// Project the bracket, apply manual picks in order and save it
    pub fn run(&self, template_id: &str, picks: &[(String, Side)]) -> Result<(BracketConfig, BracketTemplate)> {
        let registry = self.registry()?;
        let template = registry.get(template_id)?.clone();
        let teams = self.seeded_teams()?;
        info!("  → Seeded {} of {} teams for {}", teams.len(), template.team_count, template.id);

        let mut bracket =
            BracketConfig::build(&registry, template_id, teams, self.config.bracket.home_advantage)?;
        for (matchup_id, side) in picks {
            bracket.toggle_winner(matchup_id, *side)?;
            info!("  → Picked {} in {}", side, matchup_id);
        }

        self.data.save(DataDir::BRACKET, &bracket)?;
        Ok((bracket, template))
    }

    fn seeded_teams(&self) -> Result<Vec<BracketTeam>> {
        let snapshot: RatingsSnapshot = self.data.require(DataDir::SNAPSHOT)?;
        let seeds: Vec<SeedEntry> = self.data.require(DataDir::SEEDS)?;
        let overrides: NameOverrides = self
            .data
            .load(DataDir::NAME_OVERRIDES)?
            .unwrap_or_default();
        let matcher = TeamNameMatcher::new(
            snapshot.ratings.iter().map(|r| r.team_name.as_str()),
            &overrides,
            self.config.rating.fuzzy_name_matching,
        )?;

        let mut teams = Vec::with_capacity(seeds.len());
        let mut unknown = Vec::new();
        for entry in seeds {
            let rating = matcher
                .resolve(&entry.team_name)
                .and_then(|found| snapshot.find(&found.canonical));
            match rating {
                Some(rating) => teams.push(BracketTeam::from_rating(rating, entry.seed, entry.logo_url)),
                None => unknown.push(entry.team_name),
            }
        }

        if !unknown.is_empty() {
            bail!("Seeded teams missing from ratings: {}", unknown.join(", "));
        }
        Ok(teams)
    }
}

pub fn render_bracket(bracket: &BracketConfig, template: &BracketTemplate, with_odds: bool) -> String {
    let mut out = String::new();

    for round in &template.rounds {
        out.push_str(&format!("{}\n", round.name.bold().underline()));
        for matchup in bracket.matchups.iter().filter(|m| m.round == round.round) {
            out.push_str(&render_matchup(matchup));
            out.push('\n');
        }
        out.push('\n');
    }

    match bracket.champion() {
        Some(team) => out.push_str(&format!("Champion: {}\n", team.team_name.green().bold())),
        None => out.push_str(&format!("{}\n", "Champion: undecided".dimmed())),
    }

    if with_odds {
        out.push_str(&format!("\n{}\n", "Title odds".bold().underline()));
        for team in bracket.odds().champions {
            out.push_str(&format!(
                "  ({:>2}) {:<28} {:>6.2}%\n",
                team.seed,
                team.team_name,
                team.champion * 100.0
            ));
        }
    }
    out
}

fn render_matchup(matchup: &BracketMatchup) -> String {
    let name = |side: Side| match matchup.team(side) {
        Some(team) => {
            let label = format!("({}) {}", team.seed, team.team_name);
            if matchup.winner == Some(side) {
                label.green().to_string()
            } else {
                label
            }
        }
        None => "TBD".dimmed().to_string(),
    };

    let detail = match matchup.state() {
        MatchupState::Pending => "pending".dimmed().to_string(),
        state => {
            let spread = matchup.projected_spread.unwrap_or_default();
            let prob = matchup.win_prob_top.unwrap_or_default() * 100.0;
            let mut detail = format!("{:+.2}  {:.1}%", spread, prob);
            if state == MatchupState::Overridden {
                detail.push_str(&format!("  {}", "pick".yellow()));
            }
            detail
        }
    };

    format!(
        "  {:<6} {} vs {}  {}",
        matchup.id,
        name(Side::Top),
        name(Side::Bottom),
        detail
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::StorageSettings;
    use crate::domain::InitialRating;
    use crate::rating::RatingStore;

    fn service(root: &std::path::Path, team_count: u32) -> BracketService {
        let mut config = AppConfig::new();
        config.storage = StorageSettings {
            data_dir: root.to_path_buf(),
            database_path: root.join("ratings.db").to_string_lossy().into_owned(),
        };
        let service = BracketService::new(config).unwrap();

        let initial: Vec<InitialRating> = (1..=team_count)
            .map(|i| InitialRating {
                team_name: format!("Team {}", i),
                conference: String::new(),
                initial_rating: 30.0 - i as f64,
            })
            .collect();
        let mut store = RatingStore::new();
        store.bootstrap(&initial).unwrap();
        service.data.save(DataDir::SNAPSHOT, &store.snapshot()).unwrap();

        let seeds: Vec<SeedEntry> = (1..=team_count)
            .map(|i| SeedEntry {
                team_name: format!("Team {}", i),
                seed: i,
                logo_url: None,
            })
            .collect();
        service.data.save(DataDir::SEEDS, &seeds).unwrap();
        service
    }

    #[test]
    fn builds_projects_and_saves() {
        colored::control::set_override(false);
        let temp = tempfile::tempdir().unwrap();
        let service = service(temp.path(), 4);

        let (bracket, template) = service.run("standard-4", &[]).unwrap();

        assert_eq!(bracket.champion().map(|t| t.seed), Some(1));
        assert!(service.data.exists(DataDir::BRACKET));

        let text = render_bracket(&bracket, &template, true);
        assert!(text.contains("Semifinals"));
        assert!(text.contains("Champion: Team 1"));
        assert!(text.contains("Title odds"));
    }

    #[test]
    fn picks_are_applied_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let service = service(temp.path(), 4);
        let picks = vec![
            ("R1-G1".to_string(), Side::Bottom),
            ("R2-G1".to_string(), Side::Top),
        ];

        let (bracket, _) = service.run("standard-4", &picks).unwrap();

        assert_eq!(bracket.champion().map(|t| t.seed), Some(4));
    }

    #[test]
    fn unknown_seeded_team_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let service = service(temp.path(), 4);
        let mut seeds: Vec<SeedEntry> = service.data.require(DataDir::SEEDS).unwrap();
        seeds[3].team_name = "Nowhere State".to_string();
        service.data.save(DataDir::SEEDS, &seeds).unwrap();

        let err = service.run("standard-4", &[]).unwrap_err();
        assert!(err.to_string().contains("Nowhere State"));
    }

    #[test]
    fn custom_templates_join_the_registry() {
        let temp = tempfile::tempdir().unwrap();
        let service = service(temp.path(), 2);
        let custom: Vec<BracketTemplate> = serde_json::from_str(
            r#"[{"id":"final-2","name":"Championship Game","teamCount":2,
                "rounds":[{"round":1,"name":"Final","matchups":[
                    {"id":"R1-G1","top":{"seed":1},"bottom":{"seed":2}}]}]}]"#,
        )
        .unwrap();
        service.data.save(DataDir::TEMPLATES, &custom).unwrap();

        let (bracket, _) = service.run("final-2", &[]).unwrap();

        assert_eq!(bracket.champion().map(|t| t.team_name.as_str()), Some("Team 1"));
    }
}
