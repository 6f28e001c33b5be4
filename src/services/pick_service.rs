//! Pick submission: validates a user's weekly form, stores open picks and re-scores
//! the games it touched.

use std::collections::HashMap;

use indexmap::IndexMap;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dao::models::{GameEntity, PickEntity},
    dto::{
        picks::{PickSelection, PickSubmissionResponse},
        summary::PickSnapshot,
    },
    error::ServiceError,
    services::{scoring::rescore_picks, summary_service::team_directory},
    state::SharedState,
};

/// Store `user_id`'s picks for `week`.
///
/// Every selection must name a game of the week and one of its teams, otherwise
/// nothing is stored. Selections on games that kicked off at or before `now` are
/// skipped and reported as locked. A repeated game keeps the last selection.
pub async fn submit_picks(
    state: &SharedState,
    user_id: Uuid,
    week: u16,
    selections: Vec<PickSelection>,
    now: OffsetDateTime,
) -> Result<PickSubmissionResponse, ServiceError> {
    let store = state.store();
    if !store
        .list_users()
        .await?
        .iter()
        .any(|user| user.id == user_id)
    {
        return Err(ServiceError::NotFound(format!("user `{user_id}`")));
    }

    let games: HashMap<Uuid, GameEntity> = store
        .list_week_games(week)
        .await?
        .into_iter()
        .map(|game| (game.id, game))
        .collect();

    let mut chosen: IndexMap<Uuid, Uuid> = IndexMap::new();
    for selection in selections {
        let game = games.get(&selection.game_id).ok_or_else(|| {
            ServiceError::InvalidInput(format!(
                "game `{}` is not part of week {week}",
                selection.game_id
            ))
        })?;
        if !game.involves(selection.team_id) {
            return Err(ServiceError::InvalidInput(format!(
                "team `{}` does not play in game `{}`",
                selection.team_id, game.id
            )));
        }
        chosen.insert(game.id, selection.team_id);
    }

    let mut locked = Vec::new();
    let mut open: Vec<(Uuid, Uuid)> = Vec::new();
    for (game_id, team_id) in chosen {
        let Some(game) = games.get(&game_id) else {
            continue;
        };
        if game.has_started(now) {
            debug!(%user_id, %game_id, "game already started; pick locked");
            locked.push(game_id);
            continue;
        }
        open.push((game_id, team_id));
    }

    let touched_ids: Vec<Uuid> = open.iter().map(|(game_id, _)| *game_id).collect();
    let _gates = state.lock_result_gates(&touched_ids).await;

    let mut saved: Vec<PickEntity> = Vec::with_capacity(open.len());
    for (game_id, team_id) in open {
        saved.push(
            store
                .upsert_pick(PickEntity::new(user_id, game_id, team_id))
                .await?,
        );
    }

    if !saved.is_empty() {
        // Rows as stored under the gates, not the snapshot used for validation.
        let touched: Vec<GameEntity> = store
            .list_week_games(week)
            .await?
            .into_iter()
            .filter(|game| touched_ids.contains(&game.id))
            .collect();
        let picks = store.list_picks_for_games(touched_ids).await?;
        let changed = rescore_picks(state.scoring(), &touched, &picks);
        for pick in saved.iter_mut() {
            if let Some(rescored) = changed.iter().find(|c| c.id == pick.id) {
                *pick = rescored.clone();
            }
        }
        if !changed.is_empty() {
            store.save_picks(changed).await?;
        }
    }

    info!(
        %user_id,
        week,
        saved = saved.len(),
        locked = locked.len(),
        "picks submitted"
    );

    let teams = team_directory(state).await?;
    Ok(PickSubmissionResponse {
        saved: saved
            .iter()
            .map(|pick| PickSnapshot::from_pick(pick, &teams))
            .collect(),
        locked,
    })
}
