use crate::{config::TrellisConfig, engine::Kanban, error::Result, state::KanbanState};
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;

/// Storage trait for snapshotting kanban state and configuration
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend with an empty state and default config
    async fn initialize(&self) -> Result<()>;

    /// Saves a state snapshot
    async fn save_state(&self, state: &KanbanState) -> Result<()>;

    /// Loads the last saved state snapshot
    async fn load_state(&self) -> Result<KanbanState>;

    async fn save_config(&self, config: &TrellisConfig) -> Result<()>;

    async fn load_config(&self) -> Result<TrellisConfig>;

    /// Checks if the storage is initialized
    async fn is_initialized(&self) -> bool;
}

/// Restores a [`Kanban`] from storage, verifying the loaded state
pub async fn load_kanban(storage: &dyn Storage) -> Result<Kanban> {
    let config = storage.load_config().await?;
    let state = storage.load_state().await?;
    Kanban::from_state(state, config)
}
