use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use log::{debug, info, warn};

use super::errors::{DataError, RatingError};
use super::store::RatingStore;
use super::sync_log::{SyncLog, SyncLogEntry};
use super::types::GameAdjustment;
use crate::config::settings::RatingSettings;
use crate::domain::{GameRecord, InitialRating};
use crate::projection::project_spread;

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied(GameAdjustment),
    /// Game was already in the ledger, nothing changed
    AlreadyApplied,
    Skipped(DataError),
}

impl ApplyOutcome {
    pub fn log_entry(&self, game: &GameRecord) -> Option<SyncLogEntry> {
        match self {
            ApplyOutcome::Applied(_) => Some(SyncLogEntry::matched(game)),
            ApplyOutcome::Skipped(error) => Some(SyncLogEntry::skipped(game, error)),
            ApplyOutcome::AlreadyApplied => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecalculationSummary {
    pub processed: usize,
    pub already_applied: usize,
    pub skipped: usize,
    /// Stopped early on request; the store is consistent up to the last applied game
    pub cancelled: bool,
    pub log: SyncLog,
}

impl RecalculationSummary {
    fn record(&mut self, game: &GameRecord, outcome: &ApplyOutcome) {
        match outcome {
            ApplyOutcome::Applied(_) => self.processed += 1,
            ApplyOutcome::AlreadyApplied => self.already_applied += 1,
            ApplyOutcome::Skipped(_) => self.skipped += 1,
        }
        if let Some(entry) = outcome.log_entry(game) {
            self.log.push(entry);
        }
    }
}

/// Replays market closing lines into team ratings.
///
/// The engine is a left fold over the chronologically ordered game feed:
/// the same initial ratings and the same ordered games always yield the
/// same ratings and ledger.
pub struct RatingEngine {
    settings: RatingSettings,
}

impl RatingEngine {
    pub fn new(settings: RatingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RatingSettings {
        &self.settings
    }

    pub fn apply_game(
        &self,
        store: &mut RatingStore,
        game: &GameRecord,
    ) -> Result<ApplyOutcome, RatingError> {
        if store.contains_game(&game.game_id) {
            return Ok(ApplyOutcome::AlreadyApplied);
        }
        if game.home_team == game.away_team {
            let error = DataError::SameTeam(game.home_team.clone());
            return Ok(ApplyOutcome::Skipped(error));
        }

        let (home_before, away_before) = match self.lookup_ratings(store, game) {
            Ok(ratings) => ratings,
            Err(error) => return Ok(ApplyOutcome::Skipped(error)),
        };

        let closing_spread = match self.closing_spread(game) {
            Ok(spread) => spread,
            Err(error) => return Ok(ApplyOutcome::Skipped(error)),
        };

        let projected_spread = project_spread(
            home_before,
            away_before,
            self.settings.home_advantage,
            game.is_neutral_site,
        );
        let (home_after, away_after) =
            self.damp(home_before, away_before, closing_spread - projected_spread);

        let adjustment = GameAdjustment {
            game_id: game.game_id.clone(),
            date: game.date,
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            home_rating_before: home_before,
            home_rating_after: home_after,
            away_rating_before: away_before,
            away_rating_after: away_after,
            projected_spread,
            closing_spread: Some(closing_spread),
            line_movement: game.line_movement(),
            is_neutral_site: game.is_neutral_site,
        };

        debug!(
            "{} {} vs {}: projected {:+.2}, market {:+.2}",
            game.game_id, game.home_team, game.away_team, projected_spread, closing_spread
        );

        store.append_adjustment(adjustment.clone())?;
        Ok(ApplyOutcome::Applied(adjustment))
    }

    /// Apply games on top of the current ledger without resetting.
    ///
    /// Already-ledgered games are no-ops. A game dated before the newest
    /// ledger entry breaks chronological order and needs a `recalculate`.
    pub fn apply_games(
        &self,
        store: &mut RatingStore,
        games: &[GameRecord],
        cancel: Option<&AtomicBool>,
    ) -> Result<RecalculationSummary, RatingError> {
        self.apply_games_until(store, games, |_| is_cancelled(cancel))
    }

    /// Like `apply_games`, stopping as soon as `stop` returns true.
    ///
    /// `stop` sees the summary so far and is only consulted between games.
    pub fn apply_games_until<F>(
        &self,
        store: &mut RatingStore,
        games: &[GameRecord],
        mut stop: F,
    ) -> Result<RecalculationSummary, RatingError>
    where
        F: FnMut(&RecalculationSummary) -> bool,
    {
        let mut summary = RecalculationSummary::default();
        let mut latest = store.ledger().iter().map(|a| a.date).max();

        for game in chronological(games) {
            if stop(&summary) {
                info!("Replay cancelled after {} games", summary.processed);
                summary.cancelled = true;
                break;
            }

            let outcome = self.apply_game(store, game)?;
            if let ApplyOutcome::Applied(adjustment) = &outcome {
                if latest.is_some_and(|d| adjustment.date < d) {
                    warn!(
                        "Game {} is older than the ledger head, run a recalculation",
                        game.game_id
                    );
                }
                latest = latest.max(Some(adjustment.date));
            }
            summary.record(game, &outcome);
        }

        Ok(summary)
    }

    /// Reset ratings (fully, or from `from` onward) and replay the feed.
    pub fn recalculate(
        &self,
        store: &mut RatingStore,
        initial: &[InitialRating],
        games: &[GameRecord],
        from: Option<NaiveDate>,
        cancel: Option<&AtomicBool>,
    ) -> Result<RecalculationSummary, RatingError> {
        store.reset_to(initial, from)?;

        let replay: Vec<GameRecord> = games
            .iter()
            .filter(|g| from.is_none_or(|cutoff| g.date >= cutoff))
            .cloned()
            .collect();

        info!(
            "Replaying {} games ({} kept from earlier history)",
            replay.len(),
            store.ledger().len()
        );

        let summary = self.apply_games(store, &replay, cancel)?;

        info!(
            "Recalculation done: {} processed, {} skipped, {} already applied",
            summary.processed, summary.skipped, summary.already_applied
        );
        Ok(summary)
    }

    fn lookup_ratings(
        &self,
        store: &RatingStore,
        game: &GameRecord,
    ) -> Result<(f64, f64), DataError> {
        let home = store.get(&game.home_team);
        let away = store.get(&game.away_team);

        match (home, away) {
            (Some(home), Some(away)) => Ok((home.rating, away.rating)),
            _ => {
                let missing = [&game.home_team, &game.away_team]
                    .into_iter()
                    .filter(|name| !store.contains_team(name))
                    .cloned()
                    .collect();
                Err(DataError::TeamNotFound(missing))
            }
        }
    }

    fn closing_spread(&self, game: &GameRecord) -> Result<f64, DataError> {
        if game.no_market {
            return Err(DataError::NoOdds);
        }
        game.usable_closing_spread().ok_or(DataError::NoSpread)
    }

    /// Even split of a learning-rate fraction of the market discrepancy.
    ///
    /// Afterwards the re-projected spread sits `learning_rate` of the way
    /// from the old projection to the closing line.
    fn damp(&self, home: f64, away: f64, discrepancy: f64) -> (f64, f64) {
        let adjustment = self.settings.learning_rate * discrepancy;
        (home - adjustment / 2.0, away + adjustment / 2.0)
    }
}

fn chronological(games: &[GameRecord]) -> Vec<&GameRecord> {
    let mut ordered: Vec<&GameRecord> = games.iter().collect();
    // stable: feed order breaks same-day ties
    ordered.sort_by_key(|g| g.date);
    ordered
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::SyncStatus;

    fn settings() -> RatingSettings {
        RatingSettings {
            home_advantage: 2.5,
            learning_rate: 0.1,
            ..RatingSettings::default()
        }
    }

    fn initial() -> Vec<InitialRating> {
        [("Alpha", 10.0), ("Beta", 2.0), ("Gamma", 5.0)]
            .into_iter()
            .map(|(name, rating)| InitialRating {
                team_name: name.to_string(),
                conference: "Big".to_string(),
                initial_rating: rating,
            })
            .collect()
    }

    fn game(id: &str, day: u32, home: &str, away: &str, closing: Option<f64>) -> GameRecord {
        GameRecord {
            game_id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 11, day).unwrap(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            is_neutral_site: false,
            opening_spread: closing,
            closing_spread: closing,
            no_market: false,
        }
    }

    fn store() -> RatingStore {
        let mut store = RatingStore::new();
        store.bootstrap(&initial()).unwrap();
        store
    }

    #[test]
    fn nudges_ratings_toward_the_market() {
        let engine = RatingEngine::new(settings());
        let mut store = store();

        let outcome = engine
            .apply_game(&mut store, &game("g1", 1, "Alpha", "Beta", Some(-12.5)))
            .unwrap();

        let ApplyOutcome::Applied(adjustment) = &outcome else {
            panic!("expected applied, got {outcome:?}");
        };
        assert_eq!(adjustment.projected_spread, -10.5);
        // discrepancy -2.0, lr 0.1 -> 0.1 each way
        assert!((adjustment.home_rating_after - 10.1).abs() < 1e-12);
        assert!((adjustment.away_rating_after - 1.9).abs() < 1e-12);
        assert_eq!(store.get("Alpha").unwrap().games_processed, 1);
        assert_eq!(store.get("Gamma").unwrap().games_processed, 0);
    }

    #[test]
    fn reprojected_spread_moves_toward_closing_line() {
        let engine = RatingEngine::new(settings());
        let mut store = store();
        engine
            .apply_game(&mut store, &game("g1", 1, "Alpha", "Beta", Some(-2.5)))
            .unwrap();

        let alpha = store.get("Alpha").unwrap().rating;
        let beta = store.get("Beta").unwrap().rating;
        let reprojected = project_spread(alpha, beta, 2.5, false);
        assert_eq!(reprojected, -9.7);
    }

    #[test]
    fn applying_a_ledgered_game_is_a_no_op() {
        let engine = RatingEngine::new(settings());
        let mut store = store();
        let g = game("g1", 1, "Alpha", "Beta", Some(-12.5));

        engine.apply_game(&mut store, &g).unwrap();
        let before = store.snapshot();
        let outcome = engine.apply_game(&mut store, &g).unwrap();

        assert_eq!(outcome, ApplyOutcome::AlreadyApplied);
        assert_eq!(outcome.log_entry(&g), None);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn missing_closing_spread_is_skipped_without_side_effects() {
        let engine = RatingEngine::new(settings());
        let mut store = store();
        let mut g = game("g1", 1, "Alpha", "Beta", None);
        g.opening_spread = Some(-9.0);

        let outcome = engine.apply_game(&mut store, &g).unwrap();

        assert_eq!(outcome, ApplyOutcome::Skipped(DataError::NoSpread));
        assert_eq!(outcome.log_entry(&g).unwrap().status, SyncStatus::NoSpread);
        assert!(store.ledger().is_empty());
        assert_eq!(store.get("Alpha").unwrap().games_processed, 0);
        assert_eq!(store.get("Beta").unwrap().games_processed, 0);
    }

    #[test]
    fn game_without_any_line_is_no_spread() {
        let engine = RatingEngine::new(settings());
        let mut store = store();
        let g = game("g1", 1, "Alpha", "Beta", None);

        let outcome = engine.apply_game(&mut store, &g).unwrap();

        assert_eq!(outcome, ApplyOutcome::Skipped(DataError::NoSpread));
        assert_eq!(outcome.log_entry(&g).unwrap().status, SyncStatus::NoSpread);
        assert_eq!(store.get("Alpha").unwrap().games_processed, 0);
    }

    #[test]
    fn game_without_a_market_is_no_odds() {
        let engine = RatingEngine::new(settings());
        let mut store = store();
        let mut g = game("g1", 1, "Alpha", "Beta", None);
        g.no_market = true;

        let outcome = engine.apply_game(&mut store, &g).unwrap();

        assert_eq!(outcome, ApplyOutcome::Skipped(DataError::NoOdds));
        assert!(store.ledger().is_empty());
    }

    #[test]
    fn team_playing_itself_is_skipped() {
        let engine = RatingEngine::new(settings());
        let mut store = store();
        let g = game("g1", 1, "Alpha", "Alpha", Some(-3.0));

        let outcome = engine.apply_game(&mut store, &g).unwrap();

        assert_eq!(
            outcome,
            ApplyOutcome::Skipped(DataError::SameTeam("Alpha".to_string()))
        );
        assert_eq!(outcome.log_entry(&g).unwrap().status, SyncStatus::SameTeam);
        assert_eq!(store.get("Alpha").unwrap().games_processed, 0);
        assert_eq!(store.get("Alpha").unwrap().rating, 10.0);
        assert!(store.ledger().is_empty());
    }

    #[test]
    fn unknown_teams_are_reported_not_created() {
        let engine = RatingEngine::new(settings());
        let mut store = store();

        let outcome = engine
            .apply_game(&mut store, &game("g1", 1, "Nowhere", "Beta", Some(-1.0)))
            .unwrap();

        assert_eq!(
            outcome,
            ApplyOutcome::Skipped(DataError::TeamNotFound(vec!["Nowhere".to_string()]))
        );
        assert!(store.get("Nowhere").is_none());
    }

    #[test]
    fn bad_games_do_not_abort_the_batch() {
        let engine = RatingEngine::new(settings());
        let mut store = store();
        let games = vec![
            game("g1", 1, "Alpha", "Beta", Some(-12.0)),
            game("g2", 2, "Alpha", "Nowhere", Some(-3.0)),
            game("g3", 3, "Gamma", "Beta", None),
            game("g4", 4, "Gamma", "Alpha", Some(4.0)),
        ];

        let summary = engine
            .recalculate(&mut store, &initial(), &games, None, None)
            .unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.log.len(), 4);
        assert_eq!(summary.log.count(&SyncStatus::TeamNotFound), 1);
        assert_eq!(summary.log.count(&SyncStatus::NoSpread), 1);
    }

    #[test]
    fn replay_sorts_by_date_keeping_feed_order_within_a_day() {
        let engine = RatingEngine::new(settings());
        let mut store = store();
        let games = vec![
            game("late", 9, "Alpha", "Beta", Some(-11.0)),
            game("early-b", 2, "Gamma", "Beta", Some(-6.0)),
            game("early-a", 2, "Alpha", "Gamma", Some(-7.0)),
        ];

        engine
            .recalculate(&mut store, &initial(), &games, None, None)
            .unwrap();

        let order: Vec<&str> = store.ledger().iter().map(|a| a.game_id.as_str()).collect();
        assert_eq!(order, vec!["early-b", "early-a", "late"]);
    }

    #[test]
    fn recalculation_is_deterministic() {
        let engine = RatingEngine::new(settings());
        let games = vec![
            game("g1", 1, "Alpha", "Beta", Some(-12.0)),
            game("g2", 2, "Beta", "Gamma", Some(1.5)),
            game("g3", 3, "Gamma", "Alpha", Some(3.5)),
        ];

        let mut first = store();
        engine.recalculate(&mut first, &initial(), &games, None, None).unwrap();
        let mut second = store();
        engine.recalculate(&mut second, &initial(), &games, None, None).unwrap();
        engine.recalculate(&mut second, &initial(), &games, None, None).unwrap();

        assert_eq!(first.snapshot(), second.snapshot());
    }

    #[test]
    fn partial_recalculation_matches_full_replay() {
        let engine = RatingEngine::new(settings());
        let mut games = vec![
            game("g1", 1, "Alpha", "Beta", Some(-12.0)),
            game("g2", 5, "Beta", "Gamma", None),
            game("g3", 9, "Gamma", "Alpha", Some(3.5)),
        ];

        let mut store = store();
        engine.recalculate(&mut store, &initial(), &games, None, None).unwrap();

        // the closing line for g2 arrives late
        games[1].closing_spread = Some(2.0);
        let cutoff = NaiveDate::from_ymd_opt(2024, 11, 5);
        let summary = engine
            .recalculate(&mut store, &initial(), &games, cutoff, None)
            .unwrap();
        assert_eq!(summary.processed, 2);

        let mut full = RatingStore::new();
        full.bootstrap(&initial()).unwrap();
        engine.recalculate(&mut full, &initial(), &games, None, None).unwrap();

        assert_eq!(store.snapshot(), full.snapshot());
    }

    #[test]
    fn cancellation_stops_between_games() {
        let engine = RatingEngine::new(settings());
        let mut store = store();
        let cancel = AtomicBool::new(true);
        let games = vec![game("g1", 1, "Alpha", "Beta", Some(-12.0))];

        let summary = engine
            .recalculate(&mut store, &initial(), &games, None, Some(&cancel))
            .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.processed, 0);
        assert!(store.ledger().is_empty());
    }

    #[test]
    fn stopping_mid_replay_keeps_the_applied_prefix() {
        let engine = RatingEngine::new(settings());
        let games = vec![
            game("g1", 1, "Alpha", "Beta", Some(-12.0)),
            game("g2", 2, "Beta", "Gamma", Some(1.5)),
            game("g3", 3, "Gamma", "Alpha", Some(3.5)),
        ];
        let cancel = AtomicBool::new(false);

        let mut stopped = store();
        let summary = engine
            .apply_games_until(&mut stopped, &games, |progress| {
                if progress.processed == 2 {
                    cancel.store(true, Ordering::Relaxed);
                }
                is_cancelled(Some(&cancel))
            })
            .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.log.len(), 2);

        let mut prefix = store();
        engine.apply_games(&mut prefix, &games[..2], None).unwrap();
        assert_eq!(stopped.snapshot(), prefix.snapshot());
        assert!(RatingStore::from_snapshot(&stopped.snapshot()).is_ok());
    }
}
