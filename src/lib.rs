//! Football tournament organizer: library with models, fixture/standings logic and storage.

pub mod import;
pub mod logic;
pub mod models;
pub mod store;

pub use import::{import_teams_csv, ImportError};
pub use logic::{
    assign_groups, build_bracket, calendar, configure, draw_order, generate_groups,
    generate_knockout, generate_league, generate_triangular, goal_statistics, group_label,
    group_qualifiers, group_tables, knockout_byes, league_table, record_result,
    record_result_with_penalties, table_to_csv, GoalStatistics, StandingRow, TeamGoals, TopMatch,
    MAX_GOALS,
};
pub use models::{
    Bracket, BracketEntry, Fixture, Match, MatchId, MatchStatus, Penalties, Phase, ResultEntry,
    RunStatus, Score, Side, Stage, Team, TeamId, TeamStatus, Tournament, TournamentError,
    TournamentFormat, TournamentId, TournamentOptions, BYE_SUFFIX,
};
pub use store::{JsonStore, StoreError};
