//! Team data structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches and lookups).
pub type TeamId = Uuid;

/// A team taking part in a tournament. The engine only reads teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Player names on the roster.
    #[serde(default)]
    pub players: Vec<String>,
}

impl Team {
    /// Create a new team with the given name and an empty roster.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            players: Vec::new(),
        }
    }

    /// Create a team with an initial roster.
    pub fn with_players<I, S>(name: impl Into<String>, players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            players: players.into_iter().map(Into::into).collect(),
            ..Self::new(name)
        }
    }

    /// Add a player to the roster.
    pub fn add_player(&mut self, name: impl Into<String>) {
        self.players.push(name.into());
    }
}
