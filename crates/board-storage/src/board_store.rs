//! File system storage for the board

use board_core::error::{BoardError, Result};
use board_core::store::{BoardState, StateStore};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Name of the board file inside the base directory
pub const BOARD_FILE: &str = "board.json";

/// File system based board storage.
///
/// The whole board lives in one JSON file. Every read loads it, every write
/// loads, applies the change and replaces the file atomically.
pub struct FileSystemStorage {
    /// Base directory for board storage
    base_dir: PathBuf,
    /// Serializes access within this process
    lock: Mutex<()>,
}

impl FileSystemStorage {
    /// Create a new file system storage
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self {
            base_dir: base_dir.into(),
            lock: Mutex::new(()),
        };

        storage.ensure_dirs()?;
        Ok(storage)
    }

    /// Create storage with default directory (~/.board)
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_dir())
    }

    /// Platform data directory, or `~/.board` when there is none
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "board-service", "board")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".board")
            })
    }

    /// Ensure required directories exist
    fn ensure_dirs(&self) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(|e| {
                BoardError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create board directory: {}", e),
                ))
            })?;
            debug!("Created board directory: {:?}", self.base_dir);
        }
        Ok(())
    }

    /// Get the path of the board file
    pub fn board_path(&self) -> PathBuf {
        self.base_dir.join(BOARD_FILE)
    }

    /// Get a temporary path for atomic writes
    fn temp_path(&self) -> PathBuf {
        self.base_dir.join(format!(".{}.tmp", BOARD_FILE))
    }

    /// Get base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Read the board file; a missing file is an empty board
    fn load_state(&self) -> Result<BoardState> {
        let path = self.board_path();
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BoardState::new());
            }
            Err(e) => return Err(BoardError::Io(e)),
        };

        let state: BoardState = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| BoardError::from(e).with_context(format!("Failed to parse {:?}", path)))?;
        state.check_version()?;
        Ok(state)
    }

    /// Write state atomically (write to temp, then rename)
    fn atomic_write(&self, state: &BoardState) -> Result<()> {
        let temp_path = self.temp_path();
        let final_path = self.board_path();

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            BoardError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, state)?;
        writer.flush()?;

        // Rename to final path (atomic on most filesystems)
        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            BoardError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved board to {:?}", final_path);
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| BoardError::Storage("board file lock poisoned".to_string()))
    }
}

impl StateStore for FileSystemStorage {
    fn read<T>(&self, f: impl FnOnce(&BoardState) -> Result<T>) -> Result<T> {
        let _guard = self.guard()?;
        let state = self.load_state()?;
        f(&state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut BoardState) -> Result<T>) -> Result<T> {
        let _guard = self.guard()?;
        let mut state = self.load_state()?;
        let value = f(&mut state)?;
        self.atomic_write(&state)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::article::{ArticleDraft, ArticleService, ArticleUpdate};
    use board_core::store::{BoardStorage, CURRENT_SCHEMA_VERSION};
    use board_core::types::{Author, UserId};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileSystemStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(temp_dir.path()).unwrap();
        (storage, temp_dir)
    }

    fn alice() -> UserId {
        UserId::new("alice").unwrap()
    }

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("data").join("board");
        let storage = FileSystemStorage::new(&nested).unwrap();
        assert!(storage.base_dir().exists());
        assert!(!storage.board_path().exists());
    }

    #[test]
    fn test_empty_board_reads_default() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.list_articles().unwrap().is_empty());
        assert!(storage.list_hashtags().unwrap().is_empty());
    }

    #[test]
    fn test_state_survives_reopen() {
        let (storage, temp) = create_test_storage();
        let service = ArticleService::new(storage);
        let article = service
            .create(&alice(), ArticleDraft::new("Hello", "#rust #serde", Author::new(alice())))
            .unwrap();

        let reopened = FileSystemStorage::new(temp.path()).unwrap();
        let loaded = reopened.load_article(article.id).unwrap();
        assert_eq!(loaded, article);
        assert_eq!(loaded.hashtag_names(), vec!["rust", "serde"]);
    }

    #[test]
    fn test_update_sweeps_on_disk() {
        let (storage, temp) = create_test_storage();
        let service = ArticleService::new(storage);
        let article = service
            .create(&alice(), ArticleDraft::new("t", "#a #b", Author::new(alice())))
            .unwrap();

        service
            .update(&alice(), article.id, ArticleUpdate::default().content("#b #c"))
            .unwrap();

        let reopened = FileSystemStorage::new(temp.path()).unwrap();
        let names: Vec<String> = reopened
            .list_hashtags()
            .unwrap()
            .into_iter()
            .map(|r| r.name.into_string())
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_atomic_write() {
        let (storage, _temp) = create_test_storage();
        storage
            .insert_article(
                ArticleDraft::new("t", "c", Author::new(alice())),
                Default::default(),
                board_core::AuditInfo::now(&alice()),
            )
            .unwrap();

        assert!(!storage.temp_path().exists());
        let content = fs::read_to_string(storage.board_path()).unwrap();
        assert!(content.contains("schema_version"));
    }

    #[test]
    fn test_failed_write_does_not_touch_file() {
        let (storage, _temp) = create_test_storage();
        let result = storage.delete_article(board_core::ArticleId(1));
        assert!(result.is_err());
        assert!(!storage.board_path().exists());
    }

    #[test]
    fn test_newer_schema_rejected() {
        let (storage, _temp) = create_test_storage();
        fs::write(
            storage.board_path(),
            format!("{{\"schema_version\": {}}}", CURRENT_SCHEMA_VERSION + 1),
        )
        .unwrap();

        assert!(matches!(
            storage.list_articles(),
            Err(BoardError::UnsupportedSchemaVersion(_))
        ));
    }

    #[test]
    fn test_corrupt_file_reports_path() {
        let (storage, _temp) = create_test_storage();
        fs::write(storage.board_path(), "not json").unwrap();

        let err = storage.list_articles().unwrap_err();
        assert!(err.to_string().contains("board.json"));
    }
}
