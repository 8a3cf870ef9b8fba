//! Match (fixture), Score, Stage and Phase.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Unique identifier for a match within a tournament (`P1`, `P2`, ...).
pub type MatchId = String;

/// Which side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

/// Knockout round, named after the bracket size it is played in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Any round larger than the round of 16 (32, 64, ...).
    RoundOf(u32),
    #[serde(rename = "round_of_16")]
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    Final,
}

impl Phase {
    /// Phase of a round played by `size` bracket slots (a power of two).
    pub fn for_bracket_size(size: usize) -> Self {
        match size {
            0..=2 => Phase::Final,
            3..=4 => Phase::SemiFinal,
            5..=8 => Phase::QuarterFinal,
            9..=16 => Phase::RoundOf16,
            n => Phase::RoundOf(u32::try_from(n).unwrap_or(u32::MAX)),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::RoundOf(n) => write!(f, "Round of {}", n),
            Phase::RoundOf16 => write!(f, "Round of 16"),
            Phase::QuarterFinal => write!(f, "Quarter-final"),
            Phase::SemiFinal => write!(f, "Semi-final"),
            Phase::Final => write!(f, "Final"),
        }
    }
}

/// Format-specific part of a match. Only groups carry a label, only knockout carries a phase.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum Stage {
    Knockout { phase: Phase },
    League,
    Triangular,
    Group { label: String },
}

/// Penalty shoot-out used to settle a drawn knockout match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Penalties {
    pub home: u32,
    pub away: u32,
}

/// Final score of a played match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub home_goals: u32,
    pub away_goals: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalties: Option<Penalties>,
}

impl Score {
    pub fn new(home_goals: u32, away_goals: u32) -> Self {
        Self {
            home_goals,
            away_goals,
            penalties: None,
        }
    }

    /// True when regular time ended level (a shoot-out does not change this).
    pub fn is_draw(&self) -> bool {
        self.home_goals == self.away_goals
    }

    /// Winning side, falling back to the shoot-out when goals are level.
    pub fn winner(&self) -> Option<Side> {
        use std::cmp::Ordering::*;
        match self.home_goals.cmp(&self.away_goals) {
            Greater => Some(Side::Home),
            Less => Some(Side::Away),
            Equal => match self.penalties {
                Some(p) if p.home > p.away => Some(Side::Home),
                Some(p) if p.away > p.home => Some(Side::Away),
                _ => None,
            },
        }
    }
}

/// Progress of a match. Goals exist only once it is played.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Played(Score),
}

/// An unscheduled pairing produced by a fixture generator (no id yet).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub tournament_id: TournamentId,
    pub home: TeamId,
    pub away: TeamId,
    pub matchday: u32,
    pub stage: Stage,
}

/// A single match between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub home: TeamId,
    pub away: TeamId,
    /// None until someone schedules it.
    pub scheduled_at: Option<NaiveDateTime>,
    pub status: MatchStatus,
    pub matchday: u32,
    pub stage: Stage,
}

impl Match {
    /// Turn a generated fixture into a pending match with the given id.
    pub fn from_fixture(id: impl Into<MatchId>, fixture: Fixture) -> Self {
        Self {
            id: id.into(),
            tournament_id: fixture.tournament_id,
            home: fixture.home,
            away: fixture.away,
            scheduled_at: None,
            status: MatchStatus::Pending,
            matchday: fixture.matchday,
            stage: fixture.stage,
        }
    }

    pub fn score(&self) -> Option<&Score> {
        match &self.status {
            MatchStatus::Played(score) => Some(score),
            _ => None,
        }
    }

    pub fn is_played(&self) -> bool {
        self.score().is_some()
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.home == team || self.away == team
    }

    /// Group label for group-stage matches.
    pub fn group_label(&self) -> Option<&str> {
        match &self.stage {
            Stage::Group { label } => Some(label),
            _ => None,
        }
    }

    pub fn team_on(&self, side: Side) -> TeamId {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    /// `(goals_for, goals_against)` from `team`'s perspective; None if unplayed or not involved.
    pub fn goals_for(&self, team: TeamId) -> Option<(u32, u32)> {
        let score = self.score()?;
        if team == self.home {
            Some((score.home_goals, score.away_goals))
        } else if team == self.away {
            Some((score.away_goals, score.home_goals))
        } else {
            None
        }
    }
}
