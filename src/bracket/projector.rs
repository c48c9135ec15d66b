use std::collections::{BTreeSet, HashMap, VecDeque};

use log::debug;

use super::errors::BracketError;
use super::types::{BracketMatchup, BracketTeam, MatchupState, Side};
use crate::projection::{project_spread, win_prob_from_spread};

/// Evaluate every matchup in round order.
///
/// Winners flow into the slots they feed, spreads are projected as neutral
/// site games, and matchups without a manual override get the favored side
/// as winner. An even spread goes to the top team.
pub fn project_all(matchups: &mut [BracketMatchup], hca: f64) {
    let index = index_by_id(matchups);

    for i in evaluation_order(matchups) {
        let (top_source, bottom_source) = matchups[i].source_matchup_ids.clone();
        if let Some(source) = top_source {
            matchups[i].top_team = source_winner(matchups, &index, &source);
        }
        if let Some(source) = bottom_source {
            matchups[i].bottom_team = source_winner(matchups, &index, &source);
        }
        evaluate(&mut matchups[i], hca);
    }
}

/// Force `side` to win `matchup_id`, then re-resolve everything it feeds
pub fn toggle_winner(
    matchups: &mut [BracketMatchup],
    matchup_id: &str,
    side: Side,
    hca: f64,
) -> Result<(), BracketError> {
    let target = matchups
        .iter_mut()
        .find(|m| m.id == matchup_id)
        .ok_or_else(|| BracketError::UnknownMatchup(matchup_id.to_string()))?;

    if target.team(side).is_none() {
        return Err(BracketError::SideNotReady {
            matchup: matchup_id.to_string(),
            side: side.to_string(),
        });
    }
    if target.state() == MatchupState::Pending {
        return Err(BracketError::MatchupPending(matchup_id.to_string()));
    }

    target.winner = Some(side);
    target.is_manual_override = true;
    debug!("Manual pick: {} -> {}", matchup_id, side);

    invalidate_downstream(matchups, matchup_id)?;
    project_all(matchups, hca);
    Ok(())
}

/// Drop every manual pick and project from scratch
pub fn reset_projections(matchups: &mut [BracketMatchup], hca: f64) {
    for matchup in matchups.iter_mut() {
        matchup.is_manual_override = false;
        matchup.winner = None;
    }
    project_all(matchups, hca);
}

/// Ids of every matchup reachable forward from `matchup_id`
pub fn downstream_of(
    matchups: &[BracketMatchup],
    matchup_id: &str,
) -> Result<BTreeSet<String>, BracketError> {
    if !matchups.iter().any(|m| m.id == matchup_id) {
        return Err(BracketError::UnknownMatchup(matchup_id.to_string()));
    }

    let mut reached = BTreeSet::new();
    let mut queue = VecDeque::from([matchup_id.to_string()]);
    while let Some(current) = queue.pop_front() {
        for consumer in matchups.iter().filter(|m| m.is_fed_by(&current)) {
            if reached.insert(consumer.id.clone()) {
                queue.push_back(consumer.id.clone());
            }
        }
    }
    Ok(reached)
}

/// Send everything downstream of `matchup_id` back to pending
pub fn invalidate_downstream(
    matchups: &mut [BracketMatchup],
    matchup_id: &str,
) -> Result<BTreeSet<String>, BracketError> {
    let downstream = downstream_of(matchups, matchup_id)?;

    for matchup in matchups.iter_mut().filter(|m| downstream.contains(&m.id)) {
        matchup.clear_projection();
        matchup.is_manual_override = false;
        if matchup.source_matchup_ids.0.is_some() {
            matchup.top_team = None;
        }
        if matchup.source_matchup_ids.1.is_some() {
            matchup.bottom_team = None;
        }
    }

    if !downstream.is_empty() {
        debug!("Invalidated {} matchups after {}", downstream.len(), matchup_id);
    }
    Ok(downstream)
}

fn evaluate(matchup: &mut BracketMatchup, hca: f64) {
    let (Some(top), Some(bottom)) = (&matchup.top_team, &matchup.bottom_team) else {
        matchup.clear_projection();
        matchup.is_manual_override = false;
        return;
    };

    let spread = project_spread(top.rating, bottom.rating, hca, true);
    matchup.projected_spread = Some(spread);
    matchup.win_prob_top = Some(win_prob_from_spread(spread));

    if !matchup.is_manual_override {
        matchup.winner = Some(if spread <= 0.0 { Side::Top } else { Side::Bottom });
    }
}

fn source_winner(
    matchups: &[BracketMatchup],
    index: &HashMap<String, usize>,
    source: &str,
) -> Option<BracketTeam> {
    index
        .get(source)
        .and_then(|&i| matchups[i].winner_team())
        .cloned()
}

fn index_by_id(matchups: &[BracketMatchup]) -> HashMap<String, usize> {
    matchups
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id.clone(), i))
        .collect()
}

fn evaluation_order(matchups: &[BracketMatchup]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..matchups.len()).collect();
    order.sort_by_key(|&i| (matchups[i].round, matchups[i].position));
    order
}
