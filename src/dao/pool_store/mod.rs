pub mod memory;

pub use memory::MemoryPoolStore;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{GameEntity, PickEntity, ResultChangeSet, TeamEntity, UserEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the entity store holding teams, games, picks and users.
///
/// Batch writes (`save_picks`, `commit_result`) must be applied atomically so
/// readers never observe a half-scored game. They only carry scores: a pick row
/// whose `picked_team` no longer matches the stored selection fails the batch.
pub trait PoolStore: Send + Sync {
    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>>;
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Games of one week ordered by kickoff.
    fn list_week_games(&self, week: u16) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Distinct scheduled weeks in ascending order.
    fn list_weeks(&self) -> BoxFuture<'static, StorageResult<Vec<u16>>>;
    fn list_picks_for_games(
        &self,
        game_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<PickEntity>>>;
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Insert or replace the pick of `(user_id, game_id)`, keeping the id of an existing row.
    fn upsert_pick(&self, pick: PickEntity) -> BoxFuture<'static, StorageResult<PickEntity>>;
    /// Replace a batch of existing picks in one atomic write.
    fn save_picks(&self, picks: Vec<PickEntity>) -> BoxFuture<'static, StorageResult<()>>;
    /// Apply a result change set (game, teams, picks) in one atomic write.
    fn commit_result(&self, changes: ResultChangeSet) -> BoxFuture<'static, StorageResult<()>>;
}
