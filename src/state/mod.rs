pub mod result;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::pool_store::{MemoryPoolStore, PoolStore},
    services::scoring::ScoringRules,
};

pub use self::result::{GameOutcome, ResultError, ResultTransition};

pub type SharedState = Arc<AppState>;

/// Central application state: configuration, entity store and per-game result gates.
pub struct AppState {
    config: Arc<AppConfig>,
    store: Arc<dyn PoolStore>,
    result_gates: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, store: Arc<dyn PoolStore>) -> SharedState {
        Arc::new(Self {
            config: Arc::new(config),
            store,
            result_gates: DashMap::new(),
        })
    }

    /// State backed by a fresh [`MemoryPoolStore`].
    pub fn in_memory(config: AppConfig) -> SharedState {
        Self::new(config, Arc::new(MemoryPoolStore::new()))
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Scoring rules from the configuration.
    pub fn scoring(&self) -> &ScoringRules {
        self.config.scoring()
    }

    /// Handle to the entity store.
    pub fn store(&self) -> Arc<dyn PoolStore> {
        self.store.clone()
    }

    /// Mutex serializing result updates of one game; hold it from read to commit.
    pub fn result_gate(&self, game_id: Uuid) -> Arc<Mutex<()>> {
        self.result_gates
            .entry(game_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Hold the result gates of several games at once, acquired in id order.
    pub async fn lock_result_gates(&self, game_ids: &[Uuid]) -> Vec<OwnedMutexGuard<()>> {
        let mut ids = game_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.result_gate(id).lock_owned().await);
        }
        guards
    }
}
