//! Bracket builder: round-one listing for knockout play.

use crate::logic::fixtures::knockout_byes;
use crate::models::{Bracket, BracketEntry, Phase, Team, BYE_SUFFIX};

/// Build the first-round bracket: consecutive pairings, then the trailing
/// bye recipients with " (BYE)" appended to their display name.
pub fn build_bracket(teams: &[Team]) -> Bracket {
    let byes = if teams.len() < 2 { teams.len() } else { knockout_byes(teams.len()) };
    let size = teams.len().next_power_of_two();
    let (playing, resting) = teams.split_at(teams.len() - byes);

    let mut entries: Vec<BracketEntry> = playing
        .chunks_exact(2)
        .map(|pair| BracketEntry {
            home: pair[0].id,
            home_name: pair[0].name.clone(),
            away: Some(pair[1].id),
            away_name: Some(pair[1].name.clone()),
        })
        .collect();
    entries.extend(resting.iter().map(|t| BracketEntry {
        home: t.id,
        home_name: format!("{}{}", t.name, BYE_SUFFIX),
        away: None,
        away_name: None,
    }));

    Bracket {
        size,
        byes,
        phase: Phase::for_bracket_size(size),
        entries,
    }
}
