//! Team roster import from CSV (`team,player` rows).

use crate::models::Team;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Empty team name on line {line}")]
    EmptyTeamName { line: u64 },
}

#[derive(Deserialize)]
struct RosterRow {
    team: String,
    #[serde(default)]
    player: Option<String>,
}

/// Read teams from CSV with a `team,player` header, one row per player.
///
/// Teams come out in first-seen order. A row with an empty player creates
/// the team without adding anyone to the roster.
pub fn import_teams_csv<R: std::io::Read>(reader: R) -> Result<Vec<Team>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut record = csv::StringRecord::new();
    let mut teams: Vec<Team> = Vec::new();
    while rdr.read_record(&mut record)? {
        let row: RosterRow = record.deserialize(Some(&headers))?;
        if row.team.is_empty() {
            let line = record.position().map_or(0, |p| p.line());
            return Err(ImportError::EmptyTeamName { line });
        }
        let idx = match teams.iter().position(|t| t.name.eq_ignore_ascii_case(&row.team)) {
            Some(idx) => idx,
            None => {
                teams.push(Team::new(row.team));
                teams.len() - 1
            }
        };
        if let Some(player) = row.player.filter(|p| !p.is_empty()) {
            teams[idx].add_player(player);
        }
    }
    Ok(teams)
}
