use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::types::{BracketMatchup, BracketTeam};
use crate::projection::{project_spread, win_prob_from_spread};

/// team name -> probability
pub type Distribution = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOdds {
    pub team_name: String,
    pub seed: u32,
    pub champion: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketOdds {
    /// Winner distribution of every matchup
    pub by_matchup: BTreeMap<String, Distribution>,
    /// Highest first
    pub champions: Vec<TeamOdds>,
}

/// Exact advancement odds over every path through the bracket.
///
/// Each matchup's occupants are distributions over the teams that can
/// reach it. A manual pick makes the team shown in that matchup the
/// certain winner, whatever the odds of it getting there. A slot with no team
/// contributes nothing, so odds only sum to one for a fully seeded field.
pub fn advancement_odds(matchups: &[BracketMatchup], hca: f64) -> BracketOdds {
    let teams = seeded_teams(matchups);
    let mut winners: BTreeMap<String, Distribution> = BTreeMap::new();

    let mut ordered: Vec<&BracketMatchup> = matchups.iter().collect();
    ordered.sort_by_key(|m| (m.round, m.position));

    for matchup in &ordered {
        let top = occupant(&winners, &matchup.source_matchup_ids.0, &matchup.top_team);
        let bottom = occupant(&winners, &matchup.source_matchup_ids.1, &matchup.bottom_team);

        let outcome = match (matchup.is_manual_override, matchup.winner_team()) {
            (true, Some(picked)) => Distribution::from([(picked.team_name.clone(), 1.0)]),
            _ => play_out(&top, &bottom, &teams, hca),
        };
        winners.insert(matchup.id.clone(), outcome);
    }

    let champions = final_matchup(matchups)
        .and_then(|m| winners.get(&m.id))
        .map(|dist| rank(dist, &teams))
        .unwrap_or_default();

    BracketOdds {
        by_matchup: winners,
        champions,
    }
}

fn occupant(
    winners: &BTreeMap<String, Distribution>,
    source: &Option<String>,
    seeded: &Option<BracketTeam>,
) -> Distribution {
    match (source, seeded) {
        (Some(id), _) => winners.get(id).cloned().unwrap_or_default(),
        (None, Some(team)) => Distribution::from([(team.team_name.clone(), 1.0)]),
        (None, None) => Distribution::new(),
    }
}

fn play_out(
    top: &Distribution,
    bottom: &Distribution,
    teams: &HashMap<String, BracketTeam>,
    hca: f64,
) -> Distribution {
    let mut result = Distribution::new();

    for (top_name, p_top) in top {
        for (bottom_name, p_bottom) in bottom {
            let (Some(a), Some(b)) = (teams.get(top_name), teams.get(bottom_name)) else {
                continue;
            };
            let spread = project_spread(a.rating, b.rating, hca, true);
            let p_win = win_prob_from_spread(spread);
            let p_meet = p_top * p_bottom;

            *result.entry(top_name.clone()).or_insert(0.0) += p_meet * p_win;
            *result.entry(bottom_name.clone()).or_insert(0.0) += p_meet * (1.0 - p_win);
        }
    }
    result
}

/// Teams entering through seed slots
fn seeded_teams(matchups: &[BracketMatchup]) -> HashMap<String, BracketTeam> {
    let mut teams = HashMap::new();
    for matchup in matchups {
        let (top_source, bottom_source) = &matchup.source_matchup_ids;
        for (source, team) in [(top_source, &matchup.top_team), (bottom_source, &matchup.bottom_team)] {
            if let (None, Some(team)) = (source, team) {
                teams.insert(team.team_name.clone(), team.clone());
            }
        }
    }
    teams
}

/// The one matchup whose winner feeds nothing
fn final_matchup(matchups: &[BracketMatchup]) -> Option<&BracketMatchup> {
    matchups
        .iter()
        .filter(|m| !matchups.iter().any(|other| other.is_fed_by(&m.id)))
        .max_by_key(|m| (m.round, m.position))
}

fn rank(dist: &Distribution, teams: &HashMap<String, BracketTeam>) -> Vec<TeamOdds> {
    let mut ranked: Vec<TeamOdds> = dist
        .iter()
        .filter_map(|(name, p)| {
            teams.get(name).map(|team| TeamOdds {
                team_name: name.clone(),
                seed: team.seed,
                champion: *p,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.champion.total_cmp(&a.champion).then(a.seed.cmp(&b.seed)));
    ranked
}
