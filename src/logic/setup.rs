//! Setup phase: configure a tournament (generate fixtures and reset run state).

use crate::logic::bracket::build_bracket;
use crate::logic::fixtures::{
    assign_groups, generate_groups, generate_knockout, generate_league, generate_triangular,
};
use crate::models::{
    Match, RunStatus, Team, TeamStatus, Tournament, TournamentError, TournamentFormat,
    TournamentOptions,
};
use std::collections::{BTreeMap, HashSet};

/// Replace the tournament's teams and fixtures with a fresh run in `format`.
///
/// Match ids are `P1`, `P2`, ... in generation order, every team starts
/// `Active` and the run moves to `InProgress`. Nothing from the previous run
/// survives. On error the tournament is left untouched.
pub fn configure(
    tournament: &mut Tournament,
    teams: Vec<Team>,
    format: TournamentFormat,
    options: TournamentOptions,
) -> Result<(), TournamentError> {
    if teams.is_empty() {
        return Err(TournamentError::InvalidInput(
            "at least one team is required".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = teams.iter().find(|t| !seen.insert(t.id)) {
        return Err(TournamentError::InvalidInput(format!(
            "team {} appears more than once",
            dup.name
        )));
    }

    let id = tournament.id;
    let mut groups = None;
    let mut bracket = None;
    let fixtures = match format {
        TournamentFormat::Knockout => {
            if !options.allow_byes && !teams.len().is_power_of_two() {
                return Err(TournamentError::InvalidInput(format!(
                    "{} teams need byes but byes are not allowed",
                    teams.len()
                )));
            }
            bracket = Some(build_bracket(&teams));
            generate_knockout(&teams, id)
        }
        TournamentFormat::League => generate_league(&teams, id),
        TournamentFormat::Triangular => generate_triangular(&teams, id)?,
        TournamentFormat::Groups => {
            if options.teams_per_group == 0 {
                return Err(TournamentError::InvalidInput(
                    "teams per group must be at least 1".to_string(),
                ));
            }
            let group_count = teams.len().div_ceil(options.teams_per_group);
            groups = Some(
                assign_groups(&teams, group_count)?
                    .into_iter()
                    .collect::<BTreeMap<_, _>>(),
            );
            generate_groups(&teams, id, group_count)?
        }
        TournamentFormat::DoubleElimination => {
            return Err(TournamentError::UnsupportedFormat(format));
        }
    };

    tournament.matches = fixtures
        .into_iter()
        .enumerate()
        .map(|(i, f)| Match::from_fixture(format!("P{}", i + 1), f))
        .collect();
    tournament.team_status = teams.iter().map(|t| (t.id, TeamStatus::Active)).collect();
    tournament.teams = teams;
    tournament.format = format;
    tournament.options = options;
    tournament.groups = groups;
    tournament.bracket = bracket;
    tournament.results.clear();
    tournament.status = RunStatus::InProgress;

    log::info!(
        "Configured tournament {} ({:?}): {} teams, {} matches",
        tournament.id,
        format,
        tournament.teams.len(),
        tournament.matches.len()
    );
    Ok(())
}
