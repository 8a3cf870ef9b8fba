//! Integration tests for configure and record_result in knockout play.

use football_tournament_web::{
    configure, record_result, record_result_with_penalties, MatchStatus, Penalties, RunStatus,
    Team, TeamStatus, Tournament, TournamentError, TournamentFormat, TournamentOptions,
};

fn knockout(n: usize) -> Tournament {
    let teams: Vec<Team> = (0..n).map(|i| Team::new(format!("T{i}"))).collect();
    let mut t = Tournament::new("Cup");
    configure(&mut t, teams, TournamentFormat::Knockout, TournamentOptions::default()).unwrap();
    t
}

#[test]
fn configure_assigns_ids_and_resets_status() {
    let t = knockout(8);
    let ids: Vec<_> = t.matches.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["P1", "P2", "P3", "P4"]);
    assert_eq!(t.status, RunStatus::InProgress);
    assert_eq!(t.teams_with_status(TeamStatus::Active).len(), 8);
    assert!(t.bracket.is_some());
    assert!(t.groups.is_none());
}

#[test]
fn five_teams_leave_three_byes_active() {
    let mut t = knockout(5);
    let bracket = t.bracket.clone().unwrap();
    assert_eq!(bracket.byes, 3);
    assert_eq!(t.matches.len(), 1);

    record_result(&mut t, "P1", 2, 0).unwrap();
    assert_eq!(t.teams_with_status(TeamStatus::Qualified), [t.teams[0].id]);
    assert_eq!(t.teams_with_status(TeamStatus::Eliminated), [t.teams[1].id]);
    let active = t.teams_with_status(TeamStatus::Active);
    assert_eq!(active, bracket.bye_teams().collect::<Vec<_>>());
    assert_eq!(t.status, RunStatus::Finished);
}

#[test]
fn six_teams_two_matches_two_byes() {
    let mut t = knockout(6);
    assert_eq!(t.bracket.as_ref().unwrap().byes, 2);
    assert_eq!(t.matches.len(), 2);

    record_result(&mut t, "P1", 1, 3).unwrap();
    assert_eq!(t.status, RunStatus::InProgress);
    record_result(&mut t, "P2", 4, 2).unwrap();

    assert_eq!(t.teams_with_status(TeamStatus::Eliminated), [t.teams[0].id, t.teams[3].id]);
    assert_eq!(t.teams_with_status(TeamStatus::Qualified), [t.teams[1].id, t.teams[2].id]);
    assert_eq!(t.teams_with_status(TeamStatus::Active), [t.teams[4].id, t.teams[5].id]);
    assert_eq!(t.status, RunStatus::Finished);
    assert_eq!(t.results.len(), 2);
    assert_eq!(t.results[0].match_id, "P1");
}

#[test]
fn knockout_draw_is_rejected_without_penalties() {
    let mut t = knockout(4);
    assert_eq!(
        record_result(&mut t, "P1", 1, 1),
        Err(TournamentError::KnockoutDraw("P1".to_string()))
    );
    assert_eq!(t.matches[0].status, MatchStatus::Pending);
    assert!(t.results.is_empty());

    record_result_with_penalties(&mut t, "P1", 1, 1, 4, 5).unwrap();
    let score = t.matches[0].score().unwrap();
    assert_eq!(score.penalties, Some(Penalties { home: 4, away: 5 }));
    assert_eq!(t.status_of(t.teams[1].id), TeamStatus::Qualified);
    assert_eq!(t.status_of(t.teams[0].id), TeamStatus::Eliminated);
}

#[test]
fn level_shootout_is_invalid() {
    let mut t = knockout(2);
    assert!(matches!(
        record_result_with_penalties(&mut t, "P1", 0, 0, 3, 3),
        Err(TournamentError::InvalidScore { .. })
    ));
}

#[test]
fn penalties_are_ignored_for_decisive_scores() {
    let mut t = knockout(4);
    record_result_with_penalties(&mut t, "P1", 2, 1, 0, 0).unwrap();
    let score = t.matches[0].score().unwrap();
    assert_eq!((score.home_goals, score.away_goals), (2, 1));
    assert_eq!(score.penalties, None);
    assert_eq!(t.status_of(t.teams[0].id), TeamStatus::Qualified);

    // Shoot-out values are not even checked when goals differ.
    record_result_with_penalties(&mut t, "P2", 0, 3, -1, 7).unwrap();
    assert_eq!(t.status_of(t.teams[3].id), TeamStatus::Qualified);
}

#[test]
fn results_are_final() {
    let mut t = knockout(4);
    record_result(&mut t, "P1", 2, 1).unwrap();
    assert_eq!(
        record_result(&mut t, "P1", 0, 5),
        Err(TournamentError::MatchAlreadyPlayed("P1".to_string()))
    );
    assert_eq!(t.matches[0].score().unwrap().home_goals, 2);
    assert_eq!(t.results.len(), 1);
}

#[test]
fn unknown_match_and_negative_goals_fail() {
    let mut t = knockout(4);
    assert_eq!(
        record_result(&mut t, "P99", 1, 0),
        Err(TournamentError::MatchNotFound("P99".to_string()))
    );
    assert_eq!(
        record_result(&mut t, "P1", -1, 0),
        Err(TournamentError::InvalidScore { home: -1, away: 0 })
    );
    assert_eq!(t.unplayed_count(), 2);
}

#[test]
fn byes_can_be_disallowed() {
    let teams: Vec<Team> = (0..6).map(|i| Team::new(format!("T{i}"))).collect();
    let mut t = Tournament::new("Cup");
    let options = TournamentOptions {
        allow_byes: false,
        ..TournamentOptions::default()
    };
    assert!(matches!(
        configure(&mut t, teams, TournamentFormat::Knockout, options),
        Err(TournamentError::InvalidInput(_))
    ));
    assert_eq!(t.status, RunStatus::Configuring);
}

#[test]
fn double_elimination_is_unsupported() {
    let teams: Vec<Team> = (0..4).map(|i| Team::new(format!("T{i}"))).collect();
    let mut t = Tournament::new("Cup");
    assert_eq!(
        configure(&mut t, teams, TournamentFormat::DoubleElimination, TournamentOptions::default()),
        Err(TournamentError::UnsupportedFormat(TournamentFormat::DoubleElimination))
    );
}

#[test]
fn reconfigure_replaces_previous_run() {
    let mut t = knockout(4);
    record_result(&mut t, "P1", 1, 0).unwrap();
    let teams: Vec<Team> = (0..3).map(|i| Team::new(format!("N{i}"))).collect();
    configure(&mut t, teams, TournamentFormat::Triangular, TournamentOptions::default()).unwrap();
    assert_eq!(t.matches.len(), 3);
    assert!(t.results.is_empty());
    assert!(t.bracket.is_none());
    assert_eq!(t.team_status.len(), 3);
    assert_eq!(t.teams_with_status(TeamStatus::Active).len(), 3);
}

#[test]
fn empty_or_duplicate_teams_are_rejected() {
    let mut t = Tournament::new("Cup");
    assert!(matches!(
        configure(&mut t, Vec::new(), TournamentFormat::League, TournamentOptions::default()),
        Err(TournamentError::InvalidInput(_))
    ));
    let a = Team::new("A");
    assert!(matches!(
        configure(&mut t, vec![a.clone(), a], TournamentFormat::League, TournamentOptions::default()),
        Err(TournamentError::InvalidInput(_))
    ));
}
