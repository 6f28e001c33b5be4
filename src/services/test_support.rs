//! Fixtures shared by the service tests.

use std::{io, sync::Arc};

use futures::future::BoxFuture;
use time::macros::datetime;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{
        models::{GameEntity, PickEntity, ResultChangeSet, TeamEntity, UserEntity},
        pool_store::PoolStore,
        storage::{StorageError, StorageResult},
    },
    state::{AppState, SharedState},
};

pub(crate) struct Seeded {
    pub state: SharedState,
    pub home: TeamEntity,
    pub away: TeamEntity,
    pub users: Vec<UserEntity>,
    pub game: GameEntity,
}

/// Two AFC East teams, three users and one week-1 game.
pub(crate) async fn seeded_state() -> Seeded {
    let state = AppState::in_memory(AppConfig::default());
    let store = state.store();
    let home = TeamEntity::new("Buffalo Bills", "BUF", "AFC", "East");
    let away = TeamEntity::new("New York Jets", "NYJ", "AFC", "East");
    store.save_team(home.clone()).await.unwrap();
    store.save_team(away.clone()).await.unwrap();

    let users: Vec<UserEntity> = ["ann", "bob", "cat"]
        .into_iter()
        .map(UserEntity::new)
        .collect();
    for user in &users {
        store.save_user(user.clone()).await.unwrap();
    }

    let game = GameEntity::new(1, home.id, away.id, datetime!(2025-09-07 17:00 UTC));
    store.save_game(game.clone()).await.unwrap();

    Seeded {
        state,
        home,
        away,
        users,
        game,
    }
}

pub(crate) async fn add_game(seeded: &Seeded, game: GameEntity) -> GameEntity {
    seeded.state.store().save_game(game.clone()).await.unwrap();
    game
}

pub(crate) async fn pick(
    seeded: &Seeded,
    user: &UserEntity,
    game: &GameEntity,
    team: &TeamEntity,
) -> PickEntity {
    seeded
        .state
        .store()
        .upsert_pick(PickEntity::new(user.id, game.id, team.id))
        .await
        .unwrap()
}

/// Store whose every call fails as if the backend were unreachable.
pub(crate) struct OfflineStore;

fn offline<T: Send + 'static>() -> BoxFuture<'static, StorageResult<T>> {
    Box::pin(async {
        Err(StorageError::unavailable(
            "pool store offline".into(),
            io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
        ))
    })
}

impl PoolStore for OfflineStore {
    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        offline()
    }
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        offline()
    }
    fn find_game(&self, _id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        offline()
    }
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        offline()
    }
    fn list_week_games(&self, _week: u16) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        offline()
    }
    fn list_weeks(&self) -> BoxFuture<'static, StorageResult<Vec<u16>>> {
        offline()
    }
    fn list_picks_for_games(
        &self,
        _game_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<PickEntity>>> {
        offline()
    }
    fn save_user(&self, _user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        offline()
    }
    fn save_team(&self, _team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        offline()
    }
    fn save_game(&self, _game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        offline()
    }
    fn upsert_pick(&self, _pick: PickEntity) -> BoxFuture<'static, StorageResult<PickEntity>> {
        offline()
    }
    fn save_picks(&self, _picks: Vec<PickEntity>) -> BoxFuture<'static, StorageResult<()>> {
        offline()
    }
    fn commit_result(&self, _changes: ResultChangeSet) -> BoxFuture<'static, StorageResult<()>> {
        offline()
    }
}

pub(crate) fn offline_state() -> SharedState {
    AppState::new(AppConfig::default(), Arc::new(OfflineStore))
}
