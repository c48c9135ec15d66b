use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};
use std::path::Path;

use crate::config::settings::AppConfig;
use crate::database;
use crate::domain::{GameRecord, InitialRating, NameOverrides};
use crate::exchange::DataDir;
use crate::matching::TeamNameMatcher;
use crate::rating::{RatingEngine, RatingStore, RatingsSnapshot, RecalculationSummary, SyncStatus};

pub struct ProcessingService {
    config: AppConfig,
    data: DataDir,
}

impl ProcessingService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let data = DataDir::new(&config.storage.data_dir)?;
        Ok(Self { config, data })
    }

    /// Replay the game feed into ratings and publish snapshot, sync log and
    /// the SQLite export. `from` limits the replay to games on or after it.
    pub fn run(&self, from: Option<NaiveDate>) -> Result<RecalculationSummary> {
        info!("=== Starting Rating Recalculation ===\n");

        let initial: Vec<InitialRating> = self.data.require(DataDir::INITIAL_RATINGS)?;
        let games: Vec<GameRecord> = self.data.require(DataDir::GAMES)?;
        info!(
            "  → Loaded {} teams and {} games from {}",
            initial.len(),
            games.len(),
            self.data.root().display()
        );

        let games = self.resolve_names(&initial, &games)?;
        let (mut store, from) = self.starting_store(from)?;

        let engine = RatingEngine::new(self.config.rating.clone());
        let summary = engine.recalculate(&mut store, &initial, &games, from, None)?;
        self.report(&summary);

        let snapshot = store.snapshot();
        self.data.save(DataDir::SNAPSHOT, &snapshot)?;
        self.data.save(DataDir::SYNC_LOG, &summary.log)?;
        self.export_database(&snapshot, &summary)?;

        info!("=== Recalculation Complete ===");
        Ok(summary)
    }

    fn resolve_names(
        &self,
        initial: &[InitialRating],
        games: &[GameRecord],
    ) -> Result<Vec<GameRecord>> {
        let overrides: NameOverrides = self
            .data
            .load(DataDir::NAME_OVERRIDES)?
            .unwrap_or_default();

        let matcher = TeamNameMatcher::new(
            initial.iter().map(|r| r.team_name.as_str()),
            &overrides,
            self.config.rating.fuzzy_name_matching,
        )?;
        Ok(matcher.resolve_games(games))
    }

    /// A partial replay keeps the ledger before `from`, so it starts from
    /// the last published snapshot. Without one the replay cutoff is dropped.
    fn starting_store(&self, from: Option<NaiveDate>) -> Result<(RatingStore, Option<NaiveDate>)> {
        let Some(cutoff) = from else {
            return Ok((RatingStore::new(), None));
        };

        match self.data.load::<RatingsSnapshot>(DataDir::SNAPSHOT)? {
            Some(snapshot) => {
                info!(
                    "  → Resuming from snapshot with {} ledger entries, replaying from {}",
                    snapshot.adjustments.len(),
                    cutoff
                );
                Ok((RatingStore::from_snapshot(&snapshot)?, from))
            }
            None => {
                warn!("No snapshot found, running a full recalculation instead");
                Ok((RatingStore::new(), None))
            }
        }
    }

    fn report(&self, summary: &RecalculationSummary) {
        info!(
            "  → {} matched, {} team not found, {} no odds, {} no spread, {} same team",
            summary.log.count(&SyncStatus::Matched),
            summary.log.count(&SyncStatus::TeamNotFound),
            summary.log.count(&SyncStatus::NoOdds),
            summary.log.count(&SyncStatus::NoSpread),
            summary.log.count(&SyncStatus::SameTeam),
        );

        let unresolved = summary.log.unresolved_names();
        if !unresolved.is_empty() {
            warn!(
                "{} team names could not be resolved, add them to {}.json: {}",
                unresolved.len(),
                DataDir::NAME_OVERRIDES,
                unresolved.into_iter().collect::<Vec<_>>().join(", ")
            );
        }
    }

    /// Build the export next to the target and swap it in, so readers
    /// never see a half-written database
    fn export_database(&self, snapshot: &RatingsSnapshot, summary: &RecalculationSummary) -> Result<()> {
        let db_path = &self.config.storage.database_path;
        let temp_db_path = format!("{}.tmp", db_path);

        info!("Target DB: {}, Temp DB: {}", db_path, temp_db_path);

        if Path::new(&temp_db_path).exists() {
            std::fs::remove_file(&temp_db_path)?;
        }

        self.write_db(&temp_db_path, snapshot, summary)?;

        std::fs::rename(&temp_db_path, db_path)?;
        info!("Successfully swapped database to {}", db_path);
        Ok(())
    }

    fn write_db(&self, db_path: &str, snapshot: &RatingsSnapshot, summary: &RecalculationSummary) -> Result<()> {
        let pool = database::create_pool(db_path)?;
        let mut conn = database::get_connection(&pool)?;

        database::setup::reset_database(&mut conn)?;
        database::save_snapshot(&mut conn, snapshot, &summary.log)
    }
}
