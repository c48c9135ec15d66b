//! Built-in tournament shapes.
//!
//! Matchup ids are `R<round>-G<position>`; play-in games sit in round 0.

use super::types::{BracketTemplate, MatchupSlot, SlotSource, TemplateRound};

pub fn builtin_templates() -> Vec<BracketTemplate> {
    vec![
        standard_4(),
        stepladder_5(),
        byes_6(),
        standard_8(),
        playin_10(),
        byes_12(),
        standard_16(),
        playin_18(),
    ]
}

fn standard_4() -> BracketTemplate {
    template(
        "standard-4",
        "4-Team Single Elimination",
        4,
        vec![
            round(1, "Semifinals", vec![seeded(1, 1, 1, 4), seeded(1, 2, 2, 3)]),
            paired_round(2, "Final", 1, 1),
        ],
    )
}

/// Each round the lowest survivor meets the next seed up
fn stepladder_5() -> BracketTemplate {
    template(
        "stepladder-5",
        "5-Team Stepladder",
        5,
        vec![
            round(1, "First Round", vec![seeded(1, 1, 4, 5)]),
            round(2, "Second Round", vec![slot(2, 1, seed(3), winner(1, 1))]),
            round(3, "Semifinal", vec![slot(3, 1, seed(2), winner(2, 1))]),
            round(4, "Final", vec![slot(4, 1, seed(1), winner(3, 1))]),
        ],
    )
}

fn byes_6() -> BracketTemplate {
    template(
        "byes-6",
        "6-Team With Two Byes",
        6,
        vec![
            round(1, "First Round", vec![seeded(1, 1, 3, 6), seeded(1, 2, 4, 5)]),
            round(
                2,
                "Semifinals",
                vec![
                    slot(2, 1, seed(1), winner(1, 2)),
                    slot(2, 2, seed(2), winner(1, 1)),
                ],
            ),
            paired_round(3, "Final", 2, 1),
        ],
    )
}

fn standard_8() -> BracketTemplate {
    template(
        "standard-8",
        "8-Team Single Elimination",
        8,
        vec![
            round(
                1,
                "Quarterfinals",
                vec![
                    seeded(1, 1, 1, 8),
                    seeded(1, 2, 4, 5),
                    seeded(1, 3, 3, 6),
                    seeded(1, 4, 2, 7),
                ],
            ),
            paired_round(2, "Semifinals", 1, 2),
            paired_round(3, "Final", 2, 1),
        ],
    )
}

fn playin_10() -> BracketTemplate {
    template(
        "playin-10",
        "10-Team With Play-In Games",
        10,
        vec![
            round(0, "Play-In", vec![seeded(0, 1, 7, 10), seeded(0, 2, 8, 9)]),
            round(
                1,
                "Quarterfinals",
                vec![
                    slot(1, 1, seed(1), winner(0, 2)),
                    seeded(1, 2, 4, 5),
                    seeded(1, 3, 3, 6),
                    slot(1, 4, seed(2), winner(0, 1)),
                ],
            ),
            paired_round(2, "Semifinals", 1, 2),
            paired_round(3, "Final", 2, 1),
        ],
    )
}

fn byes_12() -> BracketTemplate {
    template(
        "byes-12",
        "12-Team With Four Byes",
        12,
        vec![
            round(
                1,
                "First Round",
                vec![
                    seeded(1, 1, 8, 9),
                    seeded(1, 2, 5, 12),
                    seeded(1, 3, 6, 11),
                    seeded(1, 4, 7, 10),
                ],
            ),
            round(
                2,
                "Quarterfinals",
                vec![
                    slot(2, 1, seed(1), winner(1, 1)),
                    slot(2, 2, seed(4), winner(1, 2)),
                    slot(2, 3, seed(3), winner(1, 3)),
                    slot(2, 4, seed(2), winner(1, 4)),
                ],
            ),
            paired_round(3, "Semifinals", 2, 2),
            paired_round(4, "Final", 3, 1),
        ],
    )
}

fn standard_16() -> BracketTemplate {
    template(
        "standard-16",
        "16-Team Single Elimination",
        16,
        vec![
            round(1, "First Round", sixteen_team_first_round(seed(16), seed(15))),
            paired_round(2, "Quarterfinals", 1, 4),
            paired_round(3, "Semifinals", 2, 2),
            paired_round(4, "Final", 3, 1),
        ],
    )
}

fn playin_18() -> BracketTemplate {
    template(
        "playin-18",
        "18-Team With Play-In Games",
        18,
        vec![
            round(0, "Play-In", vec![seeded(0, 1, 16, 17), seeded(0, 2, 15, 18)]),
            round(1, "First Round", sixteen_team_first_round(winner(0, 1), winner(0, 2))),
            paired_round(2, "Quarterfinals", 1, 4),
            paired_round(3, "Semifinals", 2, 2),
            paired_round(4, "Final", 3, 1),
        ],
    )
}

fn sixteen_team_first_round(opponent_of_1: SlotSource, opponent_of_2: SlotSource) -> Vec<MatchupSlot> {
    vec![
        slot(1, 1, seed(1), opponent_of_1),
        seeded(1, 2, 8, 9),
        seeded(1, 3, 5, 12),
        seeded(1, 4, 4, 13),
        seeded(1, 5, 6, 11),
        seeded(1, 6, 3, 14),
        seeded(1, 7, 7, 10),
        slot(1, 8, seed(2), opponent_of_2),
    ]
}

/// Winners of consecutive pairs from `previous` meet
fn paired_round(number: u32, name: &str, previous: u32, games: u32) -> TemplateRound {
    let matchups = (1..=games)
        .map(|g| slot(number, g, winner(previous, 2 * g - 1), winner(previous, 2 * g)))
        .collect();
    round(number, name, matchups)
}

fn matchup_id(round: u32, game: u32) -> String {
    format!("R{round}-G{game}")
}

fn seed(n: u32) -> SlotSource {
    SlotSource::Seed(n)
}

fn winner(round: u32, game: u32) -> SlotSource {
    SlotSource::WinnerOf(matchup_id(round, game))
}

fn seeded(round: u32, game: u32, top: u32, bottom: u32) -> MatchupSlot {
    slot(round, game, seed(top), seed(bottom))
}

fn slot(round: u32, game: u32, top: SlotSource, bottom: SlotSource) -> MatchupSlot {
    MatchupSlot {
        id: matchup_id(round, game),
        top,
        bottom,
    }
}

fn round(number: u32, name: &str, matchups: Vec<MatchupSlot>) -> TemplateRound {
    TemplateRound {
        round: number,
        name: name.to_string(),
        matchups,
    }
}

fn template(id: &str, name: &str, team_count: u32, rounds: Vec<TemplateRound>) -> BracketTemplate {
    BracketTemplate {
        id: id.to_string(),
        name: name.to_string(),
        team_count,
        rounds,
    }
}
