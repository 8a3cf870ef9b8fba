//! Fixture generators: one pure function per format.
//!
//! Generators never shuffle, never schedule dates and never assign match ids;
//! the same input always yields the same fixture list.
//!
//! Team ids are expected to be unique (`configure` rejects duplicates). When
//! called directly with a repeated team, a pairing of that team with itself
//! is dropped rather than emitted as a fixture; triangular rejects it.

use crate::models::{Fixture, Phase, Stage, Team, TeamId, TournamentError, TournamentId};

/// Number of first-round byes for a knockout with `count` teams.
pub fn knockout_byes(count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    count.next_power_of_two() - count
}

/// Knockout round one: consecutive pairs in input order; the trailing `byes` teams sit out.
///
/// Returns `floor((count - byes) / 2)` fixtures; 0 or 1 teams give an empty list.
pub fn generate_knockout(teams: &[Team], tournament_id: TournamentId) -> Vec<Fixture> {
    if teams.len() < 2 {
        return Vec::new();
    }
    let byes = knockout_byes(teams.len());
    let phase = Phase::for_bracket_size(teams.len().next_power_of_two());
    teams[..teams.len() - byes]
        .chunks_exact(2)
        .filter(|pair| pair[0].id != pair[1].id)
        .map(|pair| Fixture {
            tournament_id,
            home: pair[0].id,
            away: pair[1].id,
            matchday: 1,
            stage: Stage::Knockout { phase },
        })
        .collect()
}

/// Unordered pairs `(i, j)` with `i < j`, first index at home.
fn round_robin_pairs(ids: &[TeamId]) -> Vec<(TeamId, TeamId)> {
    let mut pairs = Vec::with_capacity(ids.len() * ids.len().saturating_sub(1) / 2);
    for (i, &home) in ids.iter().enumerate() {
        for &away in ids[i + 1..].iter().filter(|&&away| away != home) {
            pairs.push((home, away));
        }
    }
    pairs
}

/// League ("liga"): every pair meets once, each match on its own sequential matchday.
pub fn generate_league(teams: &[Team], tournament_id: TournamentId) -> Vec<Fixture> {
    let ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    round_robin_pairs(&ids)
        .into_iter()
        .zip(1u32..)
        .map(|((home, away), matchday)| Fixture {
            tournament_id,
            home,
            away,
            matchday,
            stage: Stage::League,
        })
        .collect()
}

/// Triangular: exactly three teams in the rotation 0-1, 1-2, 2-0 on matchdays 1 to 3.
pub fn generate_triangular(
    teams: &[Team],
    tournament_id: TournamentId,
) -> Result<Vec<Fixture>, TournamentError> {
    if teams.len() != 3 {
        return Err(TournamentError::InvalidInput(format!(
            "triangular needs exactly 3 teams, got {}",
            teams.len()
        )));
    }
    if teams[0].id == teams[1].id || teams[1].id == teams[2].id || teams[2].id == teams[0].id {
        return Err(TournamentError::InvalidInput(
            "triangular needs three different teams".to_string(),
        ));
    }
    let rotation = [(0, 1), (1, 2), (2, 0)];
    Ok(rotation
        .iter()
        .zip(1u32..)
        .map(|(&(h, a), matchday)| Fixture {
            tournament_id,
            home: teams[h].id,
            away: teams[a].id,
            matchday,
            stage: Stage::Triangular,
        })
        .collect())
}

/// Label of the group at `index`: A, B, ..., Z, then AA, AB, ...
pub fn group_label(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    if index < 26 {
        letter.to_string()
    } else {
        format!("{}{}", group_label(index / 26 - 1), letter)
    }
}

/// Split teams into `group_count` groups by index modulo group count.
pub fn assign_groups(
    teams: &[Team],
    group_count: usize,
) -> Result<Vec<(String, Vec<TeamId>)>, TournamentError> {
    if group_count == 0 {
        return Err(TournamentError::InvalidInput(
            "group count must be at least 1".to_string(),
        ));
    }
    let mut groups: Vec<(String, Vec<TeamId>)> =
        (0..group_count).map(|g| (group_label(g), Vec::new())).collect();
    for (i, team) in teams.iter().enumerate() {
        groups[i % group_count].1.push(team.id);
    }
    Ok(groups)
}

/// Groups: round robin inside each group, all on matchday 1, labelled with the group.
pub fn generate_groups(
    teams: &[Team],
    tournament_id: TournamentId,
    group_count: usize,
) -> Result<Vec<Fixture>, TournamentError> {
    let groups = assign_groups(teams, group_count)?;
    Ok(groups
        .iter()
        .flat_map(|(label, ids)| {
            round_robin_pairs(ids)
                .into_iter()
                .map(move |(home, away)| Fixture {
                    tournament_id,
                    home,
                    away,
                    matchday: 1,
                    stage: Stage::Group {
                        label: label.clone(),
                    },
                })
        })
        .collect())
}
