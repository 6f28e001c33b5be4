//! Batch re-scoring and read-only audits of stored picks and team records.

use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::{GameEntity, TeamEntity},
    dto::{
        report::{AuditEntry, AuditReport, PickStatus, TeamDriftEntry},
        summary::alias_of,
    },
    error::ServiceError,
    services::{
        scoring::{rescore_picks, score_game},
        summary_service::team_directory,
        team_records::reconcile_team_records,
    },
    state::SharedState,
};

fn winner_label(game: &GameEntity, teams: &HashMap<Uuid, TeamEntity>) -> String {
    match game.winner {
        Some(winner) => alias_of(teams, winner),
        None if game.is_tie => "TIE".into(),
        None => "TBD".into(),
    }
}

/// Re-score every week and store the picks whose values changed, one batch per week.
///
/// Returns how many picks were corrected; a second run returns 0.
pub async fn rescore_all(state: &SharedState) -> Result<usize, ServiceError> {
    let store = state.store();
    let mut corrected = 0;
    for week in store.list_weeks().await? {
        let week_ids: Vec<Uuid> = store
            .list_week_games(week)
            .await?
            .iter()
            .map(|game| game.id)
            .collect();
        let _gates = state.lock_result_gates(&week_ids).await;

        let games = store.list_week_games(week).await?;
        let game_ids: Vec<Uuid> = games.iter().map(|game| game.id).collect();
        let picks = store.list_picks_for_games(game_ids).await?;
        let changed = rescore_picks(state.scoring(), &games, &picks);
        if changed.is_empty() {
            continue;
        }
        info!(week, picks = changed.len(), "correcting stored pick scores");
        corrected += changed.len();
        store.save_picks(changed).await?;
    }
    Ok(corrected)
}

/// Compare every stored pick score and team record with a fresh computation.
pub async fn audit_picks(state: &SharedState) -> Result<AuditReport, ServiceError> {
    let store = state.store();
    let teams = team_directory(state).await?;
    let users: HashMap<Uuid, String> = store
        .list_users()
        .await?
        .into_iter()
        .map(|user| (user.id, user.username))
        .collect();

    let mut weeks = store.list_weeks().await?;
    weeks.reverse();

    let mut entries = Vec::new();
    for week in weeks {
        let games = store.list_week_games(week).await?;
        let game_ids: Vec<Uuid> = games.iter().map(|game| game.id).collect();
        let picks = store.list_picks_for_games(game_ids).await?;

        for game in &games {
            let expected: HashMap<Uuid, _> =
                score_game(state.scoring(), game, &picks).into_iter().collect();
            let matchup = format!(
                "{} @ {}",
                alias_of(&teams, game.away_team),
                alias_of(&teams, game.home_team)
            );
            let winner = winner_label(game, &teams);

            for pick in picks.iter().filter(|pick| pick.game_id == game.id) {
                let Some(score) = expected.get(&pick.id) else {
                    continue;
                };
                entries.push(AuditEntry {
                    week,
                    game: matchup.clone(),
                    winner: winner.clone(),
                    points: game.points,
                    user: users
                        .get(&pick.user_id)
                        .cloned()
                        .unwrap_or_else(|| pick.user_id.to_string()),
                    picked_team: alias_of(&teams, pick.picked_team),
                    status: PickStatus::from(score.is_correct),
                    stored_points: pick.total_points(),
                    expected_points: score.total(),
                    drift: !score.is_stored_on(pick),
                });
            }
        }
    }

    let games = store.list_games().await?;
    let team_rows = store.list_teams().await?;
    let team_drifts: Vec<TeamDriftEntry> = reconcile_team_records(&games, &team_rows)
        .iter()
        .map(TeamDriftEntry::from)
        .collect();

    let report = AuditReport {
        entries,
        team_drifts,
    };
    if report.pick_drifts() > 0 || !report.team_drifts.is_empty() {
        warn!(
            picks = report.pick_drifts(),
            teams = report.team_drifts.len(),
            "audit found drifted rows"
        );
    }
    Ok(report)
}
