//! Game result updates: moves a game through its result lifecycle and re-scores
//! every dependent pick in the same atomic batch.

use std::slice;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dao::models::{GameEntity, PickEntity, ResultChangeSet, TeamEntity},
    error::ServiceError,
    services::scoring::{ScoringRules, rescore_picks},
    state::{
        SharedState,
        result::{GameOutcome, ResultError, ResultTransition},
    },
};

/// Compute every row touched by moving `game` to `outcome`, without writing anything.
///
/// `teams` must contain both participants; `picks` are the game's picks as stored.
pub fn plan_game_result(
    rules: &ScoringRules,
    game: &GameEntity,
    teams: &[TeamEntity],
    picks: &[PickEntity],
    outcome: GameOutcome,
) -> Result<ResultChangeSet, ResultError> {
    let transition = ResultTransition::plan(game, outcome)?;
    let teams = transition.apply_to_teams(teams)?;

    let mut updated = game.clone();
    outcome.write_to(&mut updated);
    let picks = rescore_picks(rules, slice::from_ref(&updated), picks);

    Ok(ResultChangeSet {
        game: updated,
        teams,
        picks,
    })
}

/// Apply `outcome` to the game, adjusting team records and pick scores atomically.
///
/// Updates of the same game are serialized. Re-applying the current outcome leaves
/// every counter untouched.
pub async fn recompute_game_result(
    state: &SharedState,
    game_id: Uuid,
    outcome: GameOutcome,
) -> Result<ResultChangeSet, ServiceError> {
    let gate = state.result_gate(game_id);
    let _guard = gate.lock().await;

    let store = state.store();
    let game = store
        .find_game(game_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game `{game_id}`")))?;
    let teams: Vec<TeamEntity> = store
        .list_teams()
        .await?
        .into_iter()
        .filter(|team| game.involves(team.id))
        .collect();
    let picks = store.list_picks_for_games(vec![game_id]).await?;

    let changes = plan_game_result(state.scoring(), &game, &teams, &picks, outcome)?;
    if changes.is_noop() && changes.game == game {
        debug!(%game_id, ?outcome, "result unchanged; nothing to commit");
        return Ok(changes);
    }

    store.commit_result(changes.clone()).await?;
    info!(
        %game_id,
        week = game.week,
        ?outcome,
        decided = outcome.is_decided(),
        teams = changes.teams.len(),
        picks = changes.picks.len(),
        "applied game result"
    );
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::storage::StorageError,
        services::test_support::{offline_state, pick, seeded_state},
    };

    async fn team_record(state: &SharedState, id: Uuid) -> (u32, u32, u32) {
        let team = state
            .store()
            .list_teams()
            .await
            .unwrap()
            .into_iter()
            .find(|team| team.id == id)
            .unwrap();
        (team.wins, team.losses, team.ties)
    }

    async fn stored_picks(state: &SharedState, game_id: Uuid) -> Vec<PickEntity> {
        state
            .store()
            .list_picks_for_games(vec![game_id])
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn setting_a_winner_scores_picks_and_records() {
        let s = seeded_state().await;
        pick(&s, &s.users[0], &s.game, &s.home).await;
        pick(&s, &s.users[1], &s.game, &s.away).await;

        let changes = recompute_game_result(&s.state, s.game.id, GameOutcome::Winner(s.home.id))
            .await
            .unwrap();
        assert_eq!(changes.teams.len(), 2);
        assert_eq!(changes.picks.len(), 2);

        let picks = stored_picks(&s.state, s.game.id).await;
        let winner = picks.iter().find(|p| p.user_id == s.users[0].id).unwrap();
        let loser = picks.iter().find(|p| p.user_id == s.users[1].id).unwrap();
        assert_eq!((winner.points_earned, winner.bonus_points), (1, 2));
        assert_eq!(winner.is_correct, Some(true));
        assert_eq!(loser.total_points(), 0);
        assert_eq!(loser.is_correct, Some(false));

        assert_eq!(team_record(&s.state, s.home.id).await, (1, 0, 0));
        assert_eq!(team_record(&s.state, s.away.id).await, (0, 1, 0));
    }

    #[tokio::test]
    async fn applying_the_same_winner_twice_is_idempotent() {
        let s = seeded_state().await;
        pick(&s, &s.users[0], &s.game, &s.home).await;
        pick(&s, &s.users[2], &s.game, &s.home).await;

        let outcome = GameOutcome::Winner(s.home.id);
        recompute_game_result(&s.state, s.game.id, outcome).await.unwrap();
        let picks_once = stored_picks(&s.state, s.game.id).await;

        let second = recompute_game_result(&s.state, s.game.id, outcome)
            .await
            .unwrap();
        assert!(second.is_noop());
        assert_eq!(stored_picks(&s.state, s.game.id).await, picks_once);
        assert_eq!(team_record(&s.state, s.home.id).await, (1, 0, 0));
        assert!(picks_once.iter().all(|p| p.total_points() == 1));
    }

    #[tokio::test]
    async fn clearing_a_result_restores_everything() {
        let s = seeded_state().await;
        pick(&s, &s.users[0], &s.game, &s.away).await;
        let before_home = team_record(&s.state, s.home.id).await;
        let before_away = team_record(&s.state, s.away.id).await;

        recompute_game_result(&s.state, s.game.id, GameOutcome::Winner(s.away.id))
            .await
            .unwrap();
        recompute_game_result(&s.state, s.game.id, GameOutcome::Scheduled)
            .await
            .unwrap();

        let picks = stored_picks(&s.state, s.game.id).await;
        assert_eq!(picks[0].total_points(), 0);
        assert_eq!(picks[0].is_correct, None);
        assert_eq!(team_record(&s.state, s.home.id).await, before_home);
        assert_eq!(team_record(&s.state, s.away.id).await, before_away);
        let game = s.state.store().find_game(s.game.id).await.unwrap().unwrap();
        assert_eq!((game.winner, game.is_tie), (None, false));
    }

    #[tokio::test]
    async fn switching_winner_requires_clearing_first() {
        let s = seeded_state().await;
        recompute_game_result(&s.state, s.game.id, GameOutcome::Winner(s.home.id))
            .await
            .unwrap();

        let err = recompute_game_result(&s.state, s.game.id, GameOutcome::Winner(s.away.id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Result(ResultError::InvalidTransition { .. })
        ));
        assert_eq!(team_record(&s.state, s.home.id).await, (1, 0, 0));
    }

    #[tokio::test]
    async fn tie_scores_nobody_and_counts_for_both_teams() {
        let s = seeded_state().await;
        pick(&s, &s.users[0], &s.game, &s.home).await;

        recompute_game_result(&s.state, s.game.id, GameOutcome::Tie)
            .await
            .unwrap();
        let picks = stored_picks(&s.state, s.game.id).await;
        assert_eq!(picks[0].total_points(), 0);
        assert_eq!(picks[0].is_correct, Some(false));
        assert_eq!(team_record(&s.state, s.home.id).await, (0, 0, 1));
        assert_eq!(team_record(&s.state, s.away.id).await, (0, 0, 1));
    }

    #[tokio::test]
    async fn clearing_a_tie_restores_records_and_pending_picks() {
        let s = seeded_state().await;
        pick(&s, &s.users[0], &s.game, &s.home).await;
        pick(&s, &s.users[1], &s.game, &s.away).await;

        recompute_game_result(&s.state, s.game.id, GameOutcome::Tie)
            .await
            .unwrap();
        recompute_game_result(&s.state, s.game.id, GameOutcome::Scheduled)
            .await
            .unwrap();

        assert_eq!(team_record(&s.state, s.home.id).await, (0, 0, 0));
        assert_eq!(team_record(&s.state, s.away.id).await, (0, 0, 0));
        let picks = stored_picks(&s.state, s.game.id).await;
        assert_eq!(picks.len(), 2);
        assert!(
            picks
                .iter()
                .all(|p| p.total_points() == 0 && p.is_correct.is_none())
        );
        let game = s.state.store().find_game(s.game.id).await.unwrap().unwrap();
        assert_eq!((game.winner, game.is_tie), (None, false));
    }

    #[tokio::test]
    async fn tie_cannot_become_a_winner_directly() {
        let s = seeded_state().await;
        pick(&s, &s.users[0], &s.game, &s.home).await;
        recompute_game_result(&s.state, s.game.id, GameOutcome::Tie)
            .await
            .unwrap();

        let err = recompute_game_result(&s.state, s.game.id, GameOutcome::Winner(s.home.id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Result(ResultError::InvalidTransition { .. })
        ));
        assert_eq!(team_record(&s.state, s.home.id).await, (0, 0, 1));
        assert_eq!(team_record(&s.state, s.away.id).await, (0, 0, 1));
        let picks = stored_picks(&s.state, s.game.id).await;
        assert_eq!(picks[0].is_correct, Some(false));
    }

    #[tokio::test]
    async fn concurrent_updates_apply_counters_once() {
        let s = seeded_state().await;
        let outcome = GameOutcome::Winner(s.home.id);

        let (first, second) = tokio::join!(
            recompute_game_result(&s.state, s.game.id, outcome),
            recompute_game_result(&s.state, s.game.id, outcome),
        );
        first.unwrap();
        second.unwrap();
        assert_eq!(team_record(&s.state, s.home.id).await, (1, 0, 0));
        assert_eq!(team_record(&s.state, s.away.id).await, (0, 1, 0));
    }

    #[tokio::test]
    async fn unknown_game_is_not_found() {
        let s = seeded_state().await;
        let err = recompute_game_result(&s.state, Uuid::new_v4(), GameOutcome::Tie)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn store_faults_propagate_unchanged() {
        let state = offline_state();
        let err = recompute_game_result(&state, Uuid::new_v4(), GameOutcome::Tie)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Storage(StorageError::Unavailable { .. })
        ));
        assert!(err.to_string().contains("pool store offline"));
    }

    #[test]
    fn planning_does_not_touch_inputs() {
        let home = TeamEntity::new("Green Bay Packers", "GB", "NFC", "North");
        let away = TeamEntity::new("Chicago Bears", "CHI", "NFC", "North");
        let game = GameEntity::new(
            2,
            home.id,
            away.id,
            time::macros::datetime!(2025-09-14 17:00 UTC),
        );
        let picks = vec![PickEntity::new(Uuid::new_v4(), game.id, away.id)];
        let teams = vec![home.clone(), away.clone()];

        let changes = plan_game_result(
            &ScoringRules::default(),
            &game,
            &teams,
            &picks,
            GameOutcome::Winner(away.id),
        )
        .unwrap();

        assert_eq!(changes.game.winner, Some(away.id));
        assert_eq!(changes.picks[0].total_points(), 3);
        assert_eq!(game.winner, None);
        assert_eq!(picks[0].total_points(), 0);
        assert_eq!(teams[0].wins + teams[1].wins, 0);
    }
}
