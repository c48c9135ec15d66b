use chrono::NaiveDate;

use power_ratings::bracket::{
    downstream_of, project_all, toggle_winner, BracketConfig, BracketTeam, Side, TemplateRegistry,
};
use power_ratings::config::RatingSettings;
use power_ratings::domain::{GameRecord, InitialRating};
use power_ratings::projection::project_spread;
use power_ratings::rating::{ApplyOutcome, DataError, RatingEngine, RatingStore, SyncStatus};

fn team(name: &str, rating: f64) -> InitialRating {
    InitialRating {
        team_name: name.to_string(),
        conference: "SEC".to_string(),
        initial_rating: rating,
    }
}

fn game(id: &str, day: u32, home: &str, away: &str, opening: Option<f64>, closing: Option<f64>) -> GameRecord {
    GameRecord {
        game_id: id.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        is_neutral_site: false,
        opening_spread: opening,
        closing_spread: closing,
        no_market: false,
    }
}

fn league() -> Vec<InitialRating> {
    vec![
        team("Auburn", 24.0),
        team("Alabama", 21.0),
        team("Florida", 20.5),
        team("Tennessee", 19.0),
        team("Kentucky", 14.0),
    ]
}

fn season() -> Vec<GameRecord> {
    vec![
        game("a1", 4, "Auburn", "Kentucky", Some(-12.0), Some(-13.5)),
        game("a2", 4, "Florida", "Tennessee", Some(-4.0), Some(-2.5)),
        game("a3", 7, "Alabama", "Auburn", None, Some(1.5)),
        game("a4", 8, "Kentucky", "Florida", Some(2.0), None),
        game("a5", 11, "Tennessee", "Alabama", Some(-1.0), Some(-3.0)),
        game("a6", 11, "Auburn", "Florida", Some(-6.0), Some(-7.0)),
    ]
}

#[test]
fn projection_scenarios() {
    assert_eq!(project_spread(10.0, 2.0, 2.5, false), -10.5);
    assert_eq!(project_spread(10.0, 2.0, 2.5, true), -8.0);
}

#[test]
fn missing_closing_line_leaves_ratings_untouched() {
    let engine = RatingEngine::new(RatingSettings::default());
    let mut store = RatingStore::new();
    store.bootstrap(&league()).unwrap();

    let outcome = engine
        .apply_game(&mut store, &game("c1", 2, "Auburn", "Alabama", Some(-5.0), None))
        .unwrap();

    assert_eq!(outcome, ApplyOutcome::Skipped(DataError::NoSpread));
    assert_eq!(store.get("Auburn").unwrap().games_processed, 0);
    assert_eq!(store.get("Alabama").unwrap().games_processed, 0);
    assert!(store.ledger().is_empty());

    let entry = outcome
        .log_entry(&game("c1", 2, "Auburn", "Alabama", Some(-5.0), None))
        .unwrap();
    assert_eq!(entry.status, SyncStatus::NoSpread);

    let bare = game("c2", 3, "Auburn", "Alabama", None, None);
    let outcome = engine.apply_game(&mut store, &bare).unwrap();

    assert_eq!(outcome, ApplyOutcome::Skipped(DataError::NoSpread));
    assert_eq!(outcome.log_entry(&bare).unwrap().status, SyncStatus::NoSpread);
    assert_eq!(store.get("Auburn").unwrap().games_processed, 0);
    assert!(store.ledger().is_empty());
}

#[test]
fn recalculation_is_deterministic() {
    let engine = RatingEngine::new(RatingSettings::default());

    let mut first = RatingStore::new();
    let mut second = RatingStore::new();
    engine.recalculate(&mut first, &league(), &season(), None, None).unwrap();
    engine.recalculate(&mut second, &league(), &season(), None, None).unwrap();
    engine.recalculate(&mut second, &league(), &season(), None, None).unwrap();

    let (a, b) = (first.snapshot(), second.snapshot());
    assert_eq!(a, b);
    assert_eq!(a.games_processed, 5);
    for (x, y) in a.ratings.iter().zip(&b.ratings) {
        assert_eq!(x.rating.to_bits(), y.rating.to_bits());
    }
}

#[test]
fn ledger_reproduces_ratings() {
    let engine = RatingEngine::new(RatingSettings::default());
    let mut store = RatingStore::new();
    engine.recalculate(&mut store, &league(), &season(), None, None).unwrap();

    let rebuilt = RatingStore::from_snapshot(&store.snapshot()).unwrap();

    assert_eq!(rebuilt.snapshot(), store.snapshot());
}

#[test]
fn reapplying_the_season_is_a_no_op() {
    let engine = RatingEngine::new(RatingSettings::default());
    let mut store = RatingStore::new();
    engine.recalculate(&mut store, &league(), &season(), None, None).unwrap();
    let before = store.snapshot();

    let summary = engine.apply_games(&mut store, &season(), None).unwrap();

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.already_applied, 5);
    assert_eq!(store.snapshot(), before);
}

fn eight_team_field() -> Vec<BracketTeam> {
    (1..=8)
        .map(|seed| BracketTeam {
            team_name: format!("Seed {seed}"),
            seed,
            rating: 20.0 - seed as f64,
            conference: String::new(),
            logo_url: None,
        })
        .collect()
}

#[test]
fn upset_pick_advances_the_eight_seed() {
    let registry = TemplateRegistry::builtin().unwrap();
    let mut bracket = BracketConfig::build(&registry, "standard-8", eight_team_field(), 3.0).unwrap();
    let untouched: Vec<_> = bracket
        .matchups
        .iter()
        .filter(|m| m.round == 1 && m.id != "R1-G1")
        .cloned()
        .collect();

    toggle_winner(&mut bracket.matchups, "R1-G1", Side::Bottom, 3.0).unwrap();
    project_all(&mut bracket.matchups, 3.0);

    let next = bracket
        .matchups
        .iter()
        .find(|m| m.is_fed_by("R1-G1"))
        .unwrap();
    assert_eq!(next.top_team.as_ref().map(|t| t.seed), Some(8));

    for matchup in &untouched {
        assert_eq!(bracket.matchup(&matchup.id), Some(matchup));
    }
}

#[test]
fn no_registered_template_feeds_itself() {
    let registry = TemplateRegistry::builtin().unwrap();
    for template in registry.list() {
        let teams: Vec<BracketTeam> = (1..=template.team_count)
            .map(|seed| BracketTeam {
                team_name: format!("{} {seed}", template.id),
                seed,
                rating: 0.0,
                conference: String::new(),
                logo_url: None,
            })
            .collect();
        let bracket = BracketConfig::build(&registry, &template.id, teams, 0.0).unwrap();

        for matchup in &bracket.matchups {
            let downstream = downstream_of(&bracket.matchups, &matchup.id).unwrap();
            assert!(!downstream.contains(&matchup.id), "{} loops in {}", matchup.id, template.id);
        }
        assert!(bracket.champion().is_some(), "{} has no champion", template.id);
    }
}
