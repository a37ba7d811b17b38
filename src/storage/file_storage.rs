use crate::{
    config::TrellisConfig,
    error::{Result, TrellisError},
    state::KanbanState,
    storage::Storage,
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File-based storage implementation
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const TRELLIS_DIR: &'static str = ".trellis";
    const STATE_FILE: &'static str = "state.json";
    const CONFIG_FILE: &'static str = "config.json";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::TRELLIS_DIR),
        }
    }

    fn state_file(&self) -> PathBuf {
        self.root_path.join(Self::STATE_FILE)
    }

    fn config_file(&self) -> PathBuf {
        self.root_path.join(Self::CONFIG_FILE)
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Writes pretty JSON next to `path` and renames it into place, so a
    /// crash never leaves a half-written snapshot behind
    async fn write_json<T: Serialize + Sync>(&self, path: &Path, value: &T) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        let json = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, path).await?;

        debug!(path = %path.display(), "wrote snapshot");
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        if !path.exists() {
            return Err(TrellisError::StorageNotInitialized);
        }

        let contents = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        if !self.state_file().exists() {
            self.save_state(&KanbanState::new()).await?;
        }
        if !self.config_file().exists() {
            self.save_config(&TrellisConfig::default()).await?;
        }

        Ok(())
    }

    async fn save_state(&self, state: &KanbanState) -> Result<()> {
        self.write_json(&self.state_file(), state).await
    }

    async fn load_state(&self) -> Result<KanbanState> {
        let state: KanbanState = self.read_json(&self.state_file()).await?;
        state.verify_integrity()?;
        Ok(state)
    }

    async fn save_config(&self, config: &TrellisConfig) -> Result<()> {
        config.validate()?;
        self.write_json(&self.config_file(), config).await
    }

    async fn load_config(&self) -> Result<TrellisConfig> {
        let config: TrellisConfig = self.read_json(&self.config_file()).await?;
        config.validate()?;
        Ok(config)
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.state_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::SequentialGenerator, engine::Kanban, storage::load_kanban};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_storage_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(!storage.is_initialized().await);

        storage.initialize().await.unwrap();

        assert!(storage.is_initialized().await);
        assert!(storage.state_file().exists());
        assert!(storage.config_file().exists());
        assert_eq!(storage.load_state().await.unwrap(), KanbanState::new());
        assert_eq!(
            storage.load_config().await.unwrap(),
            TrellisConfig::default()
        );
    }

    #[tokio::test]
    async fn test_initialize_keeps_existing_state() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let mut kanban = Kanban::new();
        kanban.create_board("Roadmap").unwrap();
        storage.save_state(kanban.state()).await.unwrap();

        storage.initialize().await.unwrap();
        assert_eq!(&storage.load_state().await.unwrap(), kanban.state());
    }

    #[tokio::test]
    async fn test_load_before_initialize() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(matches!(
            storage.load_state().await,
            Err(TrellisError::StorageNotInitialized)
        ));
        assert!(matches!(
            storage.load_config().await,
            Err(TrellisError::StorageNotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_state_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let mut kanban = Kanban::new().with_id_generator(SequentialGenerator::new());
        let board = kanban.create_board("Roadmap").unwrap().applied().unwrap();
        let todo = kanban.create_list(board, "Todo").unwrap().applied().unwrap();
        let done = kanban.create_list(board, "Done").unwrap().applied().unwrap();
        kanban.create_card(todo, "Ship it").unwrap();
        kanban.move_card(todo, done, 0, 0).unwrap();

        storage.save_state(kanban.state()).await.unwrap();
        let loaded = storage.load_state().await.unwrap();

        assert_eq!(&loaded, kanban.state());
        let view = loaded.get_list(&done).unwrap();
        assert_eq!(view.card_ids.len(), 1);
    }

    #[tokio::test]
    async fn test_load_rejects_corrupt_state() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let mut kanban = Kanban::new();
        let board = kanban.create_board("Roadmap").unwrap().applied().unwrap();
        kanban.create_list(board, "Todo").unwrap();

        let mut state = kanban.into_state();
        state.board_order.clear();
        storage.save_state(&state).await.unwrap();

        assert!(matches!(
            storage.load_state().await,
            Err(TrellisError::Integrity(_))
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        fs::write(storage.state_file(), "{ not json").await.unwrap();
        assert!(matches!(
            storage.load_state().await,
            Err(TrellisError::SerializationError(_))
        ));
    }

    #[tokio::test]
    async fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();

        let config = TrellisConfig {
            default_background: "forest".to_string(),
            max_text_len: 80,
        };
        storage.save_config(&config).await.unwrap();
        assert_eq!(storage.load_config().await.unwrap(), config);

        let invalid = TrellisConfig {
            max_text_len: 0,
            ..config
        };
        assert!(storage.save_config(&invalid).await.is_err());
    }

    #[tokio::test]
    async fn test_load_kanban() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.initialize().await.unwrap();
        storage
            .save_config(&TrellisConfig {
                default_background: "forest".to_string(),
                ..TrellisConfig::default()
            })
            .await
            .unwrap();

        let mut kanban = load_kanban(&storage).await.unwrap();
        let board = kanban.create_board("Roadmap").unwrap().applied().unwrap();
        assert_eq!(kanban.state().get_board(&board).unwrap().background, "forest");
    }
}
