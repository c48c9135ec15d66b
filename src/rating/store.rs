use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use super::errors::RatingError;
use super::types::{GameAdjustment, RatingsSnapshot, TeamRating};
use crate::domain::InitialRating;

/// Team-rating table plus the append-only adjustment ledger.
///
/// Holds data only. Ratings change exclusively by appending ledger records,
/// so the initial ratings plus the ledger always reproduce the table.
#[derive(Debug, Default)]
pub struct RatingStore {
    teams: BTreeMap<String, TeamRating>,
    ledger: Vec<GameAdjustment>,
    ledger_ids: HashSet<String>,
    initialized: bool,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot, verifying the ledger
    /// reproduces the snapshot's ratings exactly.
    pub fn from_snapshot(snapshot: &RatingsSnapshot) -> Result<Self, RatingError> {
        let initial = initial_ratings_of(&snapshot.ratings);
        let mut store = Self::new();
        store.bootstrap(&initial)?;

        for adjustment in &snapshot.adjustments {
            store.append_adjustment(adjustment.clone())?;
        }

        store.verify_against(&snapshot.ratings)?;
        Ok(store)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn get(&self, team_name: &str) -> Option<&TeamRating> {
        self.teams.get(team_name)
    }

    pub fn contains_team(&self, team_name: &str) -> bool {
        self.teams.contains_key(team_name)
    }

    pub fn contains_game(&self, game_id: &str) -> bool {
        self.ledger_ids.contains(game_id)
    }

    pub fn team_names(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }

    pub fn ledger(&self) -> &[GameAdjustment] {
        &self.ledger
    }

    pub fn bootstrap(&mut self, initial: &[InitialRating]) -> Result<(), RatingError> {
        if self.initialized {
            return Err(RatingError::AlreadyInitialized);
        }
        self.teams = build_table(initial)?;
        self.initialized = true;
        Ok(())
    }

    /// Owned copy, sorted by rating (highest first)
    pub fn snapshot(&self) -> RatingsSnapshot {
        let mut ratings: Vec<TeamRating> = self.teams.values().cloned().collect();
        ratings.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| a.team_name.cmp(&b.team_name))
        });

        RatingsSnapshot {
            ratings,
            adjustments: self.ledger.clone(),
            games_processed: self.ledger.len(),
        }
    }

    pub fn append_adjustment(&mut self, record: GameAdjustment) -> Result<(), RatingError> {
        if self.ledger_ids.contains(&record.game_id) {
            return Err(RatingError::DuplicateGame(record.game_id));
        }
        for team in [&record.home_team, &record.away_team] {
            if !self.teams.contains_key(team) {
                return Err(RatingError::UnknownTeam(team.clone()));
            }
        }

        self.write_rating(&record.home_team, record.home_rating_after);
        self.write_rating(&record.away_team, record.away_rating_after);

        self.ledger_ids.insert(record.game_id.clone());
        self.ledger.push(record);
        Ok(())
    }

    /// Reset to `initial`, keeping only ledger entries dated before `from`.
    ///
    /// With no `from` the ledger is cleared entirely.
    pub fn reset_to(
        &mut self,
        initial: &[InitialRating],
        from: Option<NaiveDate>,
    ) -> Result<(), RatingError> {
        let kept: Vec<GameAdjustment> = match from {
            Some(cutoff) => self
                .ledger
                .iter()
                .filter(|a| a.date < cutoff)
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        // swapped in only once every kept entry re-applies
        let mut rebuilt = Self {
            teams: build_table(initial)?,
            initialized: true,
            ..Self::default()
        };
        for adjustment in kept {
            rebuilt.append_adjustment(adjustment)?;
        }

        *self = rebuilt;
        Ok(())
    }

    fn write_rating(&mut self, team_name: &str, rating: f64) {
        if let Some(team) = self.teams.get_mut(team_name) {
            team.rating = rating;
            team.games_processed += 1;
        }
    }

    fn verify_against(&self, expected: &[TeamRating]) -> Result<(), RatingError> {
        for team in expected {
            let actual = self
                .teams
                .get(&team.team_name)
                .ok_or_else(|| RatingError::UnknownTeam(team.team_name.clone()))?;

            if actual.rating.to_bits() != team.rating.to_bits()
                || actual.games_processed != team.games_processed
            {
                return Err(RatingError::Inconsistent {
                    team: team.team_name.clone(),
                    expected: team.rating,
                    actual: actual.rating,
                });
            }
        }
        Ok(())
    }
}

pub fn initial_ratings_of(ratings: &[TeamRating]) -> Vec<InitialRating> {
    ratings
        .iter()
        .map(|r| InitialRating {
            team_name: r.team_name.clone(),
            conference: r.conference.clone(),
            initial_rating: r.initial_rating,
        })
        .collect()
}

fn build_table(initial: &[InitialRating]) -> Result<BTreeMap<String, TeamRating>, RatingError> {
    let mut teams = BTreeMap::new();

    for entry in initial {
        let team = TeamRating {
            team_name: entry.team_name.clone(),
            conference: entry.conference.clone(),
            rating: entry.initial_rating,
            initial_rating: entry.initial_rating,
            games_processed: 0,
        };
        if teams.insert(entry.team_name.clone(), team).is_some() {
            return Err(RatingError::DuplicateTeam(entry.team_name.clone()));
        }
    }

    Ok(teams)
}
