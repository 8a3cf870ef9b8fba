//! Read-only views: calendar, league table, group tables and goal statistics.
//!
//! Everything here is recomputed from the match list on each call.

use crate::models::{Match, MatchId, TeamId, Tournament};
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of a league table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StandingRow {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

impl StandingRow {
    fn new(team_id: TeamId, team_name: String) -> Self {
        Self {
            team_id,
            team_name,
            ..Self::default()
        }
    }

    fn add_result(&mut self, goals_for: u32, goals_against: u32) {
        self.played += 1;
        // Stored runs can hold scores that never went through record_result.
        self.goals_for = self.goals_for.saturating_add(goals_for);
        self.goals_against = self.goals_against.saturating_add(goals_against);
        match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => self.won += 1,
            std::cmp::Ordering::Equal => self.drawn += 1,
            std::cmp::Ordering::Less => self.lost += 1,
        }
        self.points = self.won.saturating_mul(3).saturating_add(self.drawn);
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);
    }
}

/// All matches ordered by matchday; equal matchdays keep their generation order.
pub fn calendar(tournament: &Tournament) -> Vec<&Match> {
    let mut matches: Vec<&Match> = tournament.matches.iter().collect();
    matches.sort_by_key(|m| m.matchday);
    matches
}

/// Table over `team_ids` counting only played matches in `matches`.
fn table_for<'a>(
    tournament: &Tournament,
    team_ids: &[TeamId],
    matches: impl Iterator<Item = &'a Match>,
) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = team_ids
        .iter()
        .map(|&id| StandingRow::new(id, tournament.team_name(id)))
        .collect();
    for m in matches.filter(|m| m.is_played()) {
        for row in rows.iter_mut().filter(|r| m.involves(r.team_id)) {
            if let Some((gf, ga)) = m.goals_for(row.team_id) {
                row.add_result(gf, ga);
            }
        }
    }
    // Stable: teams level on all three keys keep team order.
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });
    rows
}

/// League table over every team and every played match, whatever the format.
///
/// Points are 3 per win and 1 per draw. Order: points, goal difference, goals
/// for (all descending), then team order. A knockout match settled on
/// penalties counts as a draw.
pub fn league_table(tournament: &Tournament) -> Vec<StandingRow> {
    let ids: Vec<TeamId> = tournament.teams.iter().map(|t| t.id).collect();
    table_for(tournament, &ids, tournament.matches.iter())
}

/// One table per group, over that group's matches only. Empty unless the format is groups.
pub fn group_tables(tournament: &Tournament) -> BTreeMap<String, Vec<StandingRow>> {
    let Some(groups) = &tournament.groups else {
        return BTreeMap::new();
    };
    groups
        .iter()
        .map(|(label, ids)| {
            let matches = tournament
                .matches
                .iter()
                .filter(|m| m.group_label() == Some(label.as_str()));
            (label.clone(), table_for(tournament, ids, matches))
        })
        .collect()
}

/// The top `advancing_per_group` teams of each group table.
pub fn group_qualifiers(tournament: &Tournament) -> BTreeMap<String, Vec<TeamId>> {
    let advancing = tournament.options.advancing_per_group;
    group_tables(tournament)
        .into_iter()
        .map(|(label, rows)| {
            let ids = rows.iter().take(advancing).map(|r| r.team_id).collect();
            (label, ids)
        })
        .collect()
}

/// Goals scored and conceded by one team across played matches.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TeamGoals {
    pub team_id: TeamId,
    pub team_name: String,
    pub scored: u32,
    pub conceded: u32,
}

/// Highest-scoring played match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TopMatch {
    pub match_id: MatchId,
    pub total_goals: u32,
}

/// Team-level goal totals. Individual scorers are not tracked.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GoalStatistics {
    pub matches_played: u32,
    pub total_goals: u32,
    pub average_per_match: f64,
    pub top_match: Option<TopMatch>,
    /// In team order.
    pub per_team: Vec<TeamGoals>,
}

pub fn goal_statistics(tournament: &Tournament) -> GoalStatistics {
    let mut per_team: Vec<TeamGoals> = tournament
        .teams
        .iter()
        .map(|t| TeamGoals {
            team_id: t.id,
            team_name: t.name.clone(),
            scored: 0,
            conceded: 0,
        })
        .collect();
    let mut matches_played = 0u32;
    let mut total_goals = 0u32;
    let mut top_match: Option<TopMatch> = None;

    for m in &tournament.matches {
        let Some(score) = m.score() else { continue };
        matches_played += 1;
        let goals = score.home_goals.saturating_add(score.away_goals);
        total_goals = total_goals.saturating_add(goals);
        if top_match.as_ref().map_or(true, |t| goals > t.total_goals) {
            top_match = Some(TopMatch {
                match_id: m.id.clone(),
                total_goals: goals,
            });
        }
        for entry in per_team.iter_mut() {
            if let Some((gf, ga)) = m.goals_for(entry.team_id) {
                entry.scored = entry.scored.saturating_add(gf);
                entry.conceded = entry.conceded.saturating_add(ga);
            }
        }
    }

    let average_per_match = if matches_played == 0 {
        0.0
    } else {
        f64::from(total_goals) / f64::from(matches_played)
    };
    GoalStatistics {
        matches_played,
        total_goals,
        average_per_match,
        top_match,
        per_team,
    }
}

/// Write the league table as CSV (header row first).
pub fn table_to_csv<W: std::io::Write>(rows: &[StandingRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "position", "team", "played", "won", "drawn", "lost", "goals_for", "goals_against",
        "goal_difference", "points",
    ])?;
    for (i, r) in rows.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            r.team_name.clone(),
            r.played.to_string(),
            r.won.to_string(),
            r.drawn.to_string(),
            r.lost.to_string(),
            r.goals_for.to_string(),
            r.goals_against.to_string(),
            r.goal_difference.to_string(),
            r.points.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
