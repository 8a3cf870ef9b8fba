//! Tournament business logic: fixture generation, setup, results, standings.

mod bracket;
mod draw;
mod fixtures;
mod results;
mod setup;
mod standings;

pub use bracket::build_bracket;
pub use draw::draw_order;
pub use fixtures::{
    assign_groups, generate_groups, generate_knockout, generate_league, generate_triangular,
    group_label, knockout_byes,
};
pub use results::{record_result, record_result_with_penalties, MAX_GOALS};
pub use setup::configure;
pub use standings::{
    calendar, goal_statistics, group_qualifiers, group_tables, league_table, table_to_csv,
    GoalStatistics, StandingRow, TeamGoals, TopMatch,
};
