//! Result recording: the only mutation after `configure`.

use crate::models::{
    MatchStatus, Penalties, ResultEntry, RunStatus, Score, Side, TeamStatus, Tournament,
    TournamentError, TournamentFormat,
};
use chrono::Utc;

/// Highest goal count accepted for one side of a match (or a shoot-out).
pub const MAX_GOALS: u32 = 999;

fn goals(home: i64, away: i64) -> Result<(u32, u32), TournamentError> {
    match (u32::try_from(home), u32::try_from(away)) {
        (Ok(h), Ok(a)) if h <= MAX_GOALS && a <= MAX_GOALS => Ok((h, a)),
        _ => Err(TournamentError::InvalidScore { home, away }),
    }
}

/// Record the final score of a match.
///
/// Goals must lie in `0..=MAX_GOALS`. Results are final: a played match
/// cannot be recorded again. In knockout play the winner becomes `Qualified`
/// and the loser `Eliminated`; a draw is rejected (see
/// [`record_result_with_penalties`]). When no unplayed match remains the run
/// becomes `Finished`.
pub fn record_result(
    tournament: &mut Tournament,
    match_id: &str,
    home_goals: i64,
    away_goals: i64,
) -> Result<(), TournamentError> {
    let (home, away) = goals(home_goals, away_goals)?;
    apply_result(tournament, match_id, Score::new(home, away))
}

/// Record a knockout draw settled by a penalty shoot-out.
///
/// The shoot-out must produce a winner. Regular-time goals must be level;
/// otherwise the shoot-out is ignored and this behaves like [`record_result`].
pub fn record_result_with_penalties(
    tournament: &mut Tournament,
    match_id: &str,
    home_goals: i64,
    away_goals: i64,
    home_penalties: i64,
    away_penalties: i64,
) -> Result<(), TournamentError> {
    let (home, away) = goals(home_goals, away_goals)?;
    let mut score = Score::new(home, away);
    if score.is_draw() {
        let (pen_home, pen_away) = goals(home_penalties, away_penalties)?;
        if pen_home == pen_away {
            return Err(TournamentError::InvalidScore {
                home: home_penalties,
                away: away_penalties,
            });
        }
        score.penalties = Some(Penalties {
            home: pen_home,
            away: pen_away,
        });
    }
    apply_result(tournament, match_id, score)
}

fn apply_result(
    tournament: &mut Tournament,
    match_id: &str,
    score: Score,
) -> Result<(), TournamentError> {
    let knockout = tournament.format == TournamentFormat::Knockout;
    let m = tournament
        .get_match_mut(match_id)
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))?;
    if m.is_played() {
        return Err(TournamentError::MatchAlreadyPlayed(m.id.clone()));
    }

    let winner = score.winner();
    if knockout && winner.is_none() {
        log::warn!("Rejected drawn knockout result for match {}", m.id);
        return Err(TournamentError::KnockoutDraw(m.id.clone()));
    }

    m.status = MatchStatus::Played(score);
    let (home, away) = (m.home, m.away);
    log::debug!(
        "Recorded {} {}-{} in tournament {}",
        match_id,
        score.home_goals,
        score.away_goals,
        tournament.id
    );

    if knockout {
        let (won, lost) = match winner {
            Some(Side::Home) => (home, away),
            _ => (away, home),
        };
        tournament.team_status.insert(won, TeamStatus::Qualified);
        tournament.team_status.insert(lost, TeamStatus::Eliminated);
    }

    tournament.results.push(ResultEntry {
        match_id: match_id.to_string(),
        score,
        recorded_at: Utc::now(),
    });

    if tournament.status != RunStatus::Finished && tournament.unplayed_count() == 0 {
        tournament.status = RunStatus::Finished;
        log::info!("Tournament {} finished", tournament.id);
    }
    Ok(())
}
