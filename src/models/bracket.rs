//! First-round bracket listing.

use crate::models::fixture::Phase;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// Suffix appended to the display name of a team that skips the first round.
pub const BYE_SUFFIX: &str = " (BYE)";

/// One line of the first-round bracket: a pairing, or a bye recipient (`away` is None).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketEntry {
    pub home: TeamId,
    pub home_name: String,
    pub away: Option<TeamId>,
    pub away_name: Option<String>,
}

impl BracketEntry {
    pub fn is_bye(&self) -> bool {
        self.away.is_none()
    }
}

/// Round-one bracket. Later rounds are not built.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    /// Number of slots (next power of two of the team count).
    pub size: usize,
    pub byes: usize,
    pub phase: Phase,
    /// Pairings first (input order), then bye recipients.
    pub entries: Vec<BracketEntry>,
}

impl Bracket {
    /// Teams that skip round one.
    pub fn bye_teams(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.entries.iter().filter(|e| e.is_bye()).map(|e| e.home)
    }
}
