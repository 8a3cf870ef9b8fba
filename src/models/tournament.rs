//! Tournament run state, format, options and errors.

use crate::models::bracket::Bracket;
use crate::models::fixture::{Match, MatchId, Score};
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// Team list does not fit the requested format or options.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// No match with this id in the current match list.
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),
    /// Goal counts must be non-negative (and a shoot-out must have a winner).
    #[error("Invalid score {home}-{away}")]
    InvalidScore { home: i64, away: i64 },
    /// The match already has a result; results are final.
    #[error("Match {0} has already been played")]
    MatchAlreadyPlayed(MatchId),
    /// Knockout matches need a winner; settle the draw with penalties.
    #[error("Knockout match {0} cannot end in a draw without penalties")]
    KnockoutDraw(MatchId),
    /// Format exists but has no fixture generator.
    #[error("Format {0:?} is not supported yet")]
    UnsupportedFormat(TournamentFormat),
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How fixtures are generated.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Single elimination.
    Knockout,
    /// Full round robin.
    #[default]
    #[serde(alias = "liga")]
    League,
    /// Exactly three teams, three matches.
    Triangular,
    /// Round robin inside balanced groups.
    Groups,
    /// Not implemented; configure rejects it.
    DoubleElimination,
}

/// Options passed to `configure`. Missing fields take their defaults.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentOptions {
    /// Groups format: target group size, used to derive the group count.
    pub teams_per_group: usize,
    /// Groups format: how many teams per group `group_qualifiers` reports.
    pub advancing_per_group: usize,
    /// Knockout: accept team counts that are not a power of two.
    pub allow_byes: bool,
    /// Knockout: stored for later rounds, no effect on round one.
    pub third_place_match: bool,
    /// Knockout: stored for later rounds, no effect on round one.
    pub final_playoff: bool,
}

impl Default for TournamentOptions {
    fn default() -> Self {
        Self {
            teams_per_group: 4,
            advancing_per_group: 2,
            allow_byes: true,
            third_place_match: false,
            final_playoff: false,
        }
    }
}

/// Per-team progress (changes only in knockout play).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    #[default]
    Active,
    Qualified,
    Eliminated,
}

/// Overall phase of a tournament run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Created; no fixtures yet.
    #[default]
    Configuring,
    InProgress,
    /// Every match played. Never left once reached.
    Finished,
}

/// One recorded result, in the order results were entered.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub match_id: MatchId,
    pub score: Score,
    pub recorded_at: DateTime<Utc>,
}

/// Full tournament run: teams, fixtures, results and derived team status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub options: TournamentOptions,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    /// Groups format only: group label to team ids.
    pub groups: Option<BTreeMap<String, Vec<TeamId>>>,
    /// Knockout only: round-one bracket.
    pub bracket: Option<Bracket>,
    pub team_status: HashMap<TeamId, TeamStatus>,
    pub results: Vec<ResultEntry>,
    pub status: RunStatus,
}

impl Tournament {
    /// Create an empty tournament waiting to be configured.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format: TournamentFormat::default(),
            options: TournamentOptions::default(),
            teams: Vec::new(),
            matches: Vec::new(),
            groups: None,
            bracket: None,
            team_status: HashMap::new(),
            results: Vec::new(),
            status: RunStatus::Configuring,
        }
    }

    pub fn get_match(&self, id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: &str) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Display name of a team, or its id when unknown.
    pub fn team_name(&self, id: TeamId) -> String {
        self.team(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Status of a team; teams outside this tournament read as active.
    pub fn status_of(&self, id: TeamId) -> TeamStatus {
        self.team_status.get(&id).copied().unwrap_or_default()
    }

    /// Teams currently holding `status`, in team order.
    pub fn teams_with_status(&self, status: TeamStatus) -> Vec<TeamId> {
        self.teams
            .iter()
            .map(|t| t.id)
            .filter(|id| self.status_of(*id) == status)
            .collect()
    }

    /// Matches without a result.
    pub fn unplayed_count(&self) -> usize {
        self.matches.iter().filter(|m| !m.is_played()).count()
    }
}
