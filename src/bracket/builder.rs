use std::collections::HashMap;

use super::errors::BracketError;
use super::types::{BracketMatchup, BracketTeam, BracketTemplate, SlotSource};

/// Lay a template out as matchups, filling seed slots directly.
///
/// Slots fed by an earlier matchup stay empty until projection resolves
/// them. A seed with no team leaves its slot empty as well.
pub fn build_matchups(
    template: &BracketTemplate,
    teams: &[BracketTeam],
) -> Result<Vec<BracketMatchup>, BracketError> {
    let teams_by_seed = index_by_seed(template, teams)?;

    let matchups = template
        .rounds
        .iter()
        .flat_map(|round| {
            round
                .matchups
                .iter()
                .enumerate()
                .map(move |(position, slot)| (round.round, position as u32, slot))
        })
        .map(|(round, position, slot)| {
            let fill = |source: &SlotSource| match source {
                SlotSource::Seed(seed) => teams_by_seed.get(seed).map(|t| (*t).clone()),
                SlotSource::WinnerOf(_) => None,
            };

            BracketMatchup {
                id: slot.id.clone(),
                round,
                position,
                top_team: fill(&slot.top),
                bottom_team: fill(&slot.bottom),
                projected_spread: None,
                win_prob_top: None,
                winner: None,
                is_manual_override: false,
                source_matchup_ids: (
                    slot.top.source_id().map(str::to_string),
                    slot.bottom.source_id().map(str::to_string),
                ),
            }
        })
        .collect();

    Ok(matchups)
}

fn index_by_seed<'a>(
    template: &BracketTemplate,
    teams: &'a [BracketTeam],
) -> Result<HashMap<u32, &'a BracketTeam>, BracketError> {
    let mut by_seed = HashMap::new();
    for team in teams {
        if team.seed == 0 || team.seed > template.team_count {
            return Err(BracketError::TeamSeedOutOfRange {
                seed: team.seed,
                team_count: template.team_count,
            });
        }
        if by_seed.insert(team.seed, team).is_some() {
            return Err(BracketError::DuplicateTeamSeed(team.seed));
        }
    }
    Ok(by_seed)
}
