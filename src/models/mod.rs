//! Data structures for the football tournament: teams, matches, brackets, tournament state.

mod bracket;
mod fixture;
mod team;
mod tournament;

pub use bracket::{Bracket, BracketEntry, BYE_SUFFIX};
pub use fixture::{Fixture, Match, MatchId, MatchStatus, Penalties, Phase, Score, Side, Stage};
pub use team::{Team, TeamId};
pub use tournament::{
    ResultEntry, RunStatus, TeamStatus, Tournament, TournamentError, TournamentFormat,
    TournamentId, TournamentOptions,
};
