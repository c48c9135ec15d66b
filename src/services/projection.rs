use anyhow::{anyhow, Result};
use colored::Colorize;
use std::fmt;

use crate::config::settings::AppConfig;
use crate::domain::NameOverrides;
use crate::exchange::DataDir;
use crate::matching::TeamNameMatcher;
use crate::projection::{project_matchup, MatchupProjection};
use crate::rating::{RatingsSnapshot, TeamRating};

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionReport {
    pub home: TeamRating,
    pub away: TeamRating,
    pub neutral: bool,
    pub projection: MatchupProjection,
}

impl fmt::Display for ProjectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let venue = if self.neutral { "neutral site" } else { "home" };
        writeln!(
            f,
            "{} ({:.2}) vs {} ({:.2}), {}",
            self.home.team_name.bold(),
            self.home.rating,
            self.away.team_name.bold(),
            self.away.rating,
            venue
        )?;

        let spread = self.projection.spread;
        let favorite = if spread <= 0.0 { &self.home } else { &self.away };
        let line = format!("{:+.2}", spread);
        writeln!(f, "  Spread: {} ({} by {:.2})", line.cyan(), favorite.team_name, spread.abs())?;
        write!(
            f,
            "  {} win probability: {:.1}%",
            self.home.team_name,
            self.projection.home_win_prob * 100.0
        )
    }
}

/// Ad hoc matchup projections against the last published ratings
pub struct ProjectionService {
    config: AppConfig,
    data: DataDir,
}

impl ProjectionService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let data = DataDir::new(&config.storage.data_dir)?;
        Ok(Self { config, data })
    }

    pub fn run(&self, home: &str, away: &str, neutral: bool) -> Result<ProjectionReport> {
        let snapshot: RatingsSnapshot = self.data.require(DataDir::SNAPSHOT)?;
        let overrides: NameOverrides = self
            .data
            .load(DataDir::NAME_OVERRIDES)?
            .unwrap_or_default();
        let matcher = TeamNameMatcher::new(
            snapshot.ratings.iter().map(|r| r.team_name.as_str()),
            &overrides,
            self.config.rating.fuzzy_name_matching,
        )?;

        let lookup = |name: &str| -> Result<TeamRating> {
            matcher
                .resolve(name)
                .and_then(|found| snapshot.find(&found.canonical).cloned())
                .ok_or_else(|| anyhow!("Unknown team: {}", name))
        };
        let home = lookup(home)?;
        let away = lookup(away)?;

        let projection = project_matchup(
            home.rating,
            away.rating,
            self.config.rating.home_advantage,
            neutral,
        );

        Ok(ProjectionReport {
            home,
            away,
            neutral,
            projection,
        })
    }
}
