//! Store-backed weekly summaries and season standings.

use std::collections::HashMap;

use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::{
    dao::models::{GameEntity, TeamEntity},
    dto::summary::{CumulativeStandingsResponse, WeeklySummaryResponse},
    error::ServiceError,
    services::{
        pick_window::{WeekInfo, week_info},
        standings::{
            WeeklyStandings, build_cumulative_standings, build_weekly_standings,
            suppress_open_week,
        },
    },
    state::SharedState,
};

pub(crate) async fn team_directory(
    state: &SharedState,
) -> Result<HashMap<Uuid, TeamEntity>, ServiceError> {
    Ok(state
        .store()
        .list_teams()
        .await?
        .into_iter()
        .map(|team| (team.id, team))
        .collect())
}

async fn weekly_standings(
    state: &SharedState,
    week: u16,
) -> Result<WeeklyStandings, ServiceError> {
    let store = state.store();
    let games = store.list_week_games(week).await?;
    let game_ids: Vec<Uuid> = games.iter().map(|game| game.id).collect();
    let picks = store.list_picks_for_games(game_ids).await?;
    let users = store.list_users().await?;
    Ok(build_weekly_standings(
        state.scoring(),
        week,
        games,
        &users,
        &picks,
    ))
}

/// Ranked summary of one scheduled week.
pub async fn weekly_summary(
    state: &SharedState,
    week: u16,
) -> Result<WeeklySummaryResponse, ServiceError> {
    let standings = weekly_standings(state, week).await?;
    if standings.games.is_empty() {
        return Err(ServiceError::NotFound(format!("week {week} has no games")));
    }
    let teams = team_directory(state).await?;
    Ok(WeeklySummaryResponse::from_standings(&standings, &teams))
}

/// Current week and pick window state at `now`.
pub async fn current_week_info(
    state: &SharedState,
    now: OffsetDateTime,
) -> Result<WeekInfo, ServiceError> {
    let games: Vec<GameEntity> = state.store().list_games().await?;
    Ok(week_info(now, &games, state.config().pick_window())?)
}

/// Weekly summaries, most recent first, as shown in the list view.
///
/// Weeks nobody picked are skipped, and the current week is hidden while its
/// pick window is open.
pub async fn visible_weekly_summaries(
    state: &SharedState,
    now: OffsetDateTime,
) -> Result<Vec<WeeklySummaryResponse>, ServiceError> {
    let mut weeks = state.store().list_weeks().await?;
    weeks.reverse();

    let mut summaries = Vec::with_capacity(weeks.len());
    for week in weeks {
        let standings = weekly_standings(state, week).await?;
        if standings.has_picks {
            summaries.push(standings);
        }
    }

    let info = current_week_info(state, now).await?;
    let listed = summaries.len();
    let summaries = suppress_open_week(
        summaries,
        |standings| standings.week,
        info.current_week,
        info.is_pick_open,
    );
    if summaries.len() < listed {
        debug!(
            week = info.current_week,
            "pick window open; hiding current week summary"
        );
    }

    let teams = team_directory(state).await?;
    Ok(summaries
        .iter()
        .map(|standings| WeeklySummaryResponse::from_standings(standings, &teams))
        .collect())
}

/// Ranked running totals over every scheduled week.
pub async fn cumulative_standings(
    state: &SharedState,
) -> Result<CumulativeStandingsResponse, ServiceError> {
    let store = state.store();
    let games = store.list_games().await?;
    let game_ids: Vec<Uuid> = games.iter().map(|game| game.id).collect();
    let picks = store.list_picks_for_games(game_ids).await?;
    let users = store.list_users().await?;
    let standings = build_cumulative_standings(state.scoring(), &games, &users, &picks);
    Ok(CumulativeStandingsResponse::from(&standings))
}
