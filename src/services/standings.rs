//! Standings aggregator: ranks users per week and over the whole season.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    dao::models::{GameEntity, PickEntity, UserEntity},
    services::scoring::{ScoringRules, score_week},
};

/// Competition ("1224") ranks for totals already sorted in descending order.
///
/// Equal totals share a rank; the next lower total is ranked by its 1-based position.
pub fn competition_ranks(sorted_totals: &[i32]) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(sorted_totals.len());
    let mut previous: Option<(i32, u32)> = None;
    for (index, total) in sorted_totals.iter().copied().enumerate() {
        let position = index as u32 + 1;
        let rank = match previous {
            Some((last_total, last_rank)) if last_total == total => last_rank,
            _ => position,
        };
        ranks.push(rank);
        previous = Some((total, rank));
    }
    ranks
}

/// Stable descending sort on `score`, pairing every row with its competition rank.
pub fn rank_desc<T>(mut rows: Vec<T>, score: impl Fn(&T) -> i32) -> Vec<(u32, T)> {
    rows.sort_by_key(|row| std::cmp::Reverse(score(row)));
    let totals: Vec<i32> = rows.iter().map(&score).collect();
    competition_ranks(&totals).into_iter().zip(rows).collect()
}

/// One user's line in a weekly summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRow {
    pub user: UserEntity,
    /// Aligned with [`WeeklyStandings::games`]; `None` where the user made no pick.
    pub picks: Vec<Option<PickEntity>>,
    pub points: i32,
    pub perfect_week: bool,
    pub rank: u32,
}

/// Ranked summary of a single week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyStandings {
    pub week: u16,
    /// Games of the week, ordered by kickoff.
    pub games: Vec<GameEntity>,
    pub rows: Vec<WeekRow>,
    /// Whether anybody picked a game this week.
    pub has_picks: bool,
}

/// Build the ranked summary of `week`.
///
/// Pick rows carry freshly computed scores so the view never depends on a stale
/// write-through.
pub fn build_weekly_standings(
    rules: &ScoringRules,
    week: u16,
    games: Vec<GameEntity>,
    users: &[UserEntity],
    picks: &[PickEntity],
) -> WeeklyStandings {
    let scores = score_week(rules, &games, picks);
    let by_user_game: HashMap<(Uuid, Uuid), &PickEntity> = picks
        .iter()
        .map(|pick| ((pick.user_id, pick.game_id), pick))
        .collect();

    let rows: Vec<WeekRow> = users
        .iter()
        .map(|user| {
            let picks = games
                .iter()
                .map(|game| {
                    by_user_game.get(&(user.id, game.id)).map(|pick| {
                        let mut scored = (*pick).clone();
                        if let Some(score) = scores.picks.get(&pick.id) {
                            score.write_to(&mut scored);
                        }
                        scored
                    })
                })
                .collect();
            WeekRow {
                user: user.clone(),
                picks,
                points: scores.total_for(user.id),
                perfect_week: scores.is_perfect(user.id),
                rank: 0,
            }
        })
        .collect();

    let rows = rank_desc(rows, |row| row.points)
        .into_iter()
        .map(|(rank, row)| WeekRow { rank, ..row })
        .collect();

    WeeklyStandings {
        week,
        games,
        rows,
        has_picks: !scores.picks.is_empty(),
    }
}

/// One user's line in the season table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeRow {
    pub user: UserEntity,
    /// Aligned with [`CumulativeStandings::weeks`].
    pub weekly_points: Vec<i32>,
    pub total_points: i32,
    pub rank: u32,
}

/// Ranked running totals over the whole schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeStandings {
    /// Scheduled weeks, ascending.
    pub weeks: Vec<u16>,
    pub rows: Vec<CumulativeRow>,
}

/// Build the season table from every game and pick.
pub fn build_cumulative_standings(
    rules: &ScoringRules,
    games: &[GameEntity],
    users: &[UserEntity],
    picks: &[PickEntity],
) -> CumulativeStandings {
    let mut weeks: Vec<u16> = games.iter().map(|game| game.week).collect();
    weeks.sort_unstable();
    weeks.dedup();

    let week_of: HashMap<Uuid, u16> = games.iter().map(|game| (game.id, game.week)).collect();

    let week_scores: Vec<_> = weeks
        .iter()
        .map(|week| {
            let week_games: Vec<GameEntity> = games
                .iter()
                .filter(|game| game.week == *week)
                .cloned()
                .collect();
            let week_picks: Vec<PickEntity> = picks
                .iter()
                .filter(|pick| week_of.get(&pick.game_id) == Some(week))
                .cloned()
                .collect();
            score_week(rules, &week_games, &week_picks)
        })
        .collect();

    let rows: Vec<CumulativeRow> = users
        .iter()
        .map(|user| {
            let weekly_points: Vec<i32> = week_scores
                .iter()
                .map(|scores| scores.total_for(user.id))
                .collect();
            CumulativeRow {
                user: user.clone(),
                total_points: weekly_points.iter().sum(),
                weekly_points,
                rank: 0,
            }
        })
        .collect();

    let rows = rank_desc(rows, |row| row.total_points)
        .into_iter()
        .map(|(rank, row)| CumulativeRow { rank, ..row })
        .collect();

    CumulativeStandings { weeks, rows }
}

/// Drop the head of a most-recent-first list when it is the current week and picks
/// for it are still open.
pub fn suppress_open_week<T>(
    mut summaries: Vec<T>,
    week_of: impl Fn(&T) -> u16,
    current_week: u16,
    is_pick_open: bool,
) -> Vec<T> {
    if is_pick_open
        && summaries
            .first()
            .is_some_and(|first| week_of(first) == current_week)
    {
        summaries.remove(0);
    }
    summaries
}
