use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::DataError;
use crate::domain::GameRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Matched,
    TeamNotFound,
    NoOdds,
    NoSpread,
    SameTeam,
}

impl SyncStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SyncStatus::Matched => "matched",
            SyncStatus::TeamNotFound => "team_not_found",
            SyncStatus::NoOdds => "no_odds",
            SyncStatus::NoSpread => "no_spread",
            SyncStatus::SameTeam => "same_team",
        }
    }
}

impl From<&DataError> for SyncStatus {
    fn from(error: &DataError) -> Self {
        match error {
            DataError::TeamNotFound(_) => SyncStatus::TeamNotFound,
            DataError::NoOdds => SyncStatus::NoOdds,
            DataError::NoSpread => SyncStatus::NoSpread,
            DataError::SameTeam(_) => SyncStatus::SameTeam,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncLogEntry {
    pub game_id: String,
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub status: SyncStatus,
    /// Names that could not be resolved, for override creation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

impl SyncLogEntry {
    pub fn matched(game: &GameRecord) -> Self {
        Self::new(game, SyncStatus::Matched, Vec::new())
    }

    pub fn skipped(game: &GameRecord, error: &DataError) -> Self {
        let unresolved = match error {
            DataError::TeamNotFound(names) => names.clone(),
            _ => Vec::new(),
        };
        Self::new(game, SyncStatus::from(error), unresolved)
    }

    fn new(game: &GameRecord, status: SyncStatus, unresolved: Vec<String>) -> Self {
        Self {
            game_id: game.game_id.clone(),
            date: game.date,
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            status,
            unresolved,
        }
    }
}

/// Per-game matching/skip log for operator triage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncLog {
    entries: Vec<SyncLogEntry>,
}

impl SyncLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: SyncLogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SyncLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, status: &SyncStatus) -> usize {
        self.entries.iter().filter(|e| &e.status == status).count()
    }

    /// Every distinct unresolved team name, sorted
    pub fn unresolved_names(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .flat_map(|e| e.unresolved.iter().cloned())
            .collect()
    }
}
