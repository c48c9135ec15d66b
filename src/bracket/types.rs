use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rating::TeamRating;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketTeam {
    pub team_name: String,
    pub seed: u32,
    pub rating: f64,
    #[serde(default)]
    pub conference: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl BracketTeam {
    pub fn from_rating(rating: &TeamRating, seed: u32, logo_url: Option<String>) -> Self {
        Self {
            team_name: rating.team_name.clone(),
            seed,
            rating: rating.rating,
            conference: rating.conference.clone(),
            logo_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Top => write!(f, "top"),
            Side::Bottom => write!(f, "bottom"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            other => Err(format!("expected top or bottom, got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchupState {
    /// At least one team slot unresolved
    Pending,
    /// Both teams known, winner picked from the projected spread
    Provisional,
    /// Winner set by hand
    Overridden,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketMatchup {
    pub id: String,
    /// 0 is the play-in round
    pub round: u32,
    pub position: u32,
    pub top_team: Option<BracketTeam>,
    pub bottom_team: Option<BracketTeam>,
    /// Top-team perspective, negative = top favored
    pub projected_spread: Option<f64>,
    pub win_prob_top: Option<f64>,
    pub winner: Option<Side>,
    pub is_manual_override: bool,
    pub source_matchup_ids: (Option<String>, Option<String>),
}

impl BracketMatchup {
    pub fn team(&self, side: Side) -> Option<&BracketTeam> {
        match side {
            Side::Top => self.top_team.as_ref(),
            Side::Bottom => self.bottom_team.as_ref(),
        }
    }

    pub fn winner_team(&self) -> Option<&BracketTeam> {
        self.winner.and_then(|side| self.team(side))
    }

    pub fn is_fed_by(&self, matchup_id: &str) -> bool {
        let (top, bottom) = &self.source_matchup_ids;
        top.as_deref() == Some(matchup_id) || bottom.as_deref() == Some(matchup_id)
    }

    pub fn state(&self) -> MatchupState {
        if self.top_team.is_none() || self.bottom_team.is_none() {
            MatchupState::Pending
        } else if self.is_manual_override {
            MatchupState::Overridden
        } else {
            MatchupState::Provisional
        }
    }

    pub(crate) fn clear_projection(&mut self) {
        self.projected_spread = None;
        self.win_prob_top = None;
        self.winner = None;
    }
}

/// Where a template slot gets its team from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSource {
    Seed(u32),
    WinnerOf(String),
}

impl SlotSource {
    pub fn source_id(&self) -> Option<&str> {
        match self {
            SlotSource::WinnerOf(id) => Some(id),
            SlotSource::Seed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupSlot {
    pub id: String,
    pub top: SlotSource,
    pub bottom: SlotSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRound {
    pub round: u32,
    pub name: String,
    pub matchups: Vec<MatchupSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketTemplate {
    pub id: String,
    pub name: String,
    pub team_count: u32,
    pub rounds: Vec<TemplateRound>,
}

impl BracketTemplate {
    pub fn slots(&self) -> impl Iterator<Item = (&TemplateRound, &MatchupSlot)> {
        self.rounds
            .iter()
            .flat_map(|round| round.matchups.iter().map(move |slot| (round, slot)))
    }

    pub fn matchup_count(&self) -> usize {
        self.rounds.iter().map(|r| r.matchups.len()).sum()
    }
}
