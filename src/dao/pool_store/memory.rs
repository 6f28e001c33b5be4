//! In-process entity store used by the batch binary and the test-suite.

use std::{collections::HashMap, sync::Arc};

use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::PoolStore;
use crate::dao::{
    models::{GameEntity, PickEntity, ResultChangeSet, TeamEntity, UserEntity},
    storage::{StorageError, StorageResult},
};

#[derive(Default)]
struct Tables {
    users: IndexMap<Uuid, UserEntity>,
    teams: IndexMap<Uuid, TeamEntity>,
    games: IndexMap<Uuid, GameEntity>,
    picks: IndexMap<Uuid, PickEntity>,
    /// (user_id, game_id) -> pick id
    pick_index: HashMap<(Uuid, Uuid), Uuid>,
}

impl Tables {
    fn ensure_game(&self, id: Uuid) -> StorageResult<()> {
        if self.games.contains_key(&id) {
            Ok(())
        } else {
            Err(StorageError::MissingRow { entity: "game", id })
        }
    }

    fn ensure_picks(&self, picks: &[PickEntity]) -> StorageResult<()> {
        for pick in picks {
            let Some(stored) = self.picks.get(&pick.id) else {
                return Err(StorageError::MissingRow {
                    entity: "pick",
                    id: pick.id,
                });
            };
            if stored.user_id != pick.user_id || stored.game_id != pick.game_id {
                return Err(StorageError::Constraint {
                    constraint: "pick_user_game_immutable",
                });
            }
            if stored.picked_team != pick.picked_team {
                return Err(StorageError::Constraint {
                    constraint: "pick_scored_for_current_team",
                });
            }
        }
        Ok(())
    }
}

/// Entity store keeping every table behind a single lock.
#[derive(Clone, Default)]
pub struct MemoryPoolStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryPoolStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoolStore for MemoryPoolStore {
    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.users.values().cloned().collect()) })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.teams.values().cloned().collect()) })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.games.get(&id).cloned()) })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.games.values().cloned().collect()) })
    }

    fn list_week_games(&self, week: u16) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let tables = inner.read().await;
            let mut games: Vec<GameEntity> = tables
                .games
                .values()
                .filter(|game| game.week == week)
                .cloned()
                .collect();
            games.sort_by_key(|game| game.game_time);
            Ok(games)
        })
    }

    fn list_weeks(&self) -> BoxFuture<'static, StorageResult<Vec<u16>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let tables = inner.read().await;
            let mut weeks: Vec<u16> = tables.games.values().map(|game| game.week).collect();
            weeks.sort_unstable();
            weeks.dedup();
            Ok(weeks)
        })
    }

    fn list_picks_for_games(
        &self,
        game_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<PickEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let tables = inner.read().await;
            Ok(tables
                .picks
                .values()
                .filter(|pick| game_ids.contains(&pick.game_id))
                .cloned()
                .collect())
        })
    }

    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut tables = inner.write().await;
            if tables
                .users
                .values()
                .any(|existing| existing.username == user.username && existing.id != user.id)
            {
                return Err(StorageError::Constraint {
                    constraint: "user_username_unique",
                });
            }
            tables.users.insert(user.id, user);
            Ok(())
        })
    }

    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.write().await.teams.insert(team.id, team);
            Ok(())
        })
    }

    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut tables = inner.write().await;
            for team_id in [game.home_team, game.away_team] {
                if !tables.teams.contains_key(&team_id) {
                    return Err(StorageError::MissingRow {
                        entity: "team",
                        id: team_id,
                    });
                }
            }
            tables.games.insert(game.id, game);
            Ok(())
        })
    }

    fn upsert_pick(&self, mut pick: PickEntity) -> BoxFuture<'static, StorageResult<PickEntity>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut tables = inner.write().await;
            tables.ensure_game(pick.game_id)?;
            if !tables.users.contains_key(&pick.user_id) {
                return Err(StorageError::MissingRow {
                    entity: "user",
                    id: pick.user_id,
                });
            }

            let key = (pick.user_id, pick.game_id);
            if let Some(existing_id) = tables.pick_index.get(&key).copied() {
                pick.id = existing_id;
            } else {
                tables.pick_index.insert(key, pick.id);
            }
            tables.picks.insert(pick.id, pick.clone());
            Ok(pick)
        })
    }

    fn save_picks(&self, picks: Vec<PickEntity>) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut tables = inner.write().await;
            tables.ensure_picks(&picks)?;
            for pick in picks {
                tables.picks.insert(pick.id, pick);
            }
            Ok(())
        })
    }

    fn commit_result(&self, changes: ResultChangeSet) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut tables = inner.write().await;
            let ResultChangeSet { game, teams, picks } = changes;

            tables.ensure_game(game.id)?;
            if let Some(team) = teams.iter().find(|team| !tables.teams.contains_key(&team.id)) {
                return Err(StorageError::MissingRow {
                    entity: "team",
                    id: team.id,
                });
            }
            tables.ensure_picks(&picks)?;

            tables.games.insert(game.id, game);
            for team in teams {
                tables.teams.insert(team.id, team);
            }
            for pick in picks {
                tables.picks.insert(pick.id, pick);
            }
            Ok(())
        })
    }
}
