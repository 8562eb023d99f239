//! File-based storage implementation for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult, sort_newest_first};
use crate::project::ProjectRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each project as `<id>.json` in one directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self { base_path })
    }

    /// File store in the platform data directory.
    ///
    /// On Linux: `~/.local/share/fieldsketch/projects/`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("fieldsketch").join("projects"))
    }

    fn project_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn read_record(path: &Path) -> StorageResult<ProjectRecord> {
    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&json).map_err(|e| {
        StorageError::Serialization(format!("Failed to parse {}: {e}", path.display()))
    })
}

impl Storage for FileStorage {
    fn save(&self, record: &ProjectRecord) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(&record.id);
        let json = serde_json::to_string_pretty(record);
        Box::pin(async move {
            let json = json?;
            fs::write(&path, json)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Option<ProjectRecord>>> {
        let path = self.project_path(id);
        Box::pin(async move {
            if !path.exists() {
                return Ok(None);
            }
            read_record(&path).map(Some)
        })
    }

    /// Unreadable files are skipped with a warning.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<ProjectRecord>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;

            let mut records = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_none_or(|ext| ext != "json") {
                    continue;
                }
                match read_record(&path) {
                    Ok(record) => records.push(record),
                    Err(err) => log::warn!("Skipping {}: {err}", path.display()),
                }
            }
            sort_newest_first(&mut records);
            Ok(records)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {e}", path.display()))
                })?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Project;
    use pollster::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let record = Project::new("Test Project").to_record();

        block_on(storage.save(&record)).unwrap();
        let loaded = block_on(storage.load(&record.id)).unwrap().unwrap();
        assert_eq!(loaded.name, "Test Project");
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_file_storage_missing() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(block_on(storage.load("nonexistent")).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_list_skips_garbage() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let mut first = Project::new("first").to_record();
        first.updated_at = 1;
        let mut second = Project::new("second").to_record();
        second.updated_at = 2;
        block_on(storage.save(&first)).unwrap();
        block_on(storage.save(&second)).unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let list = block_on(storage.list()).unwrap();
        let names: Vec<_> = list.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn test_file_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let record = Project::new("gone").to_record();

        block_on(storage.save(&record)).unwrap();
        block_on(storage.delete(&record.id)).unwrap();
        assert!(block_on(storage.load(&record.id)).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let mut record = Project::new("odd").to_record();
        record.id = "site/12:north*".to_string();

        block_on(storage.save(&record)).unwrap();
        let loaded = block_on(storage.load("site/12:north*")).unwrap().unwrap();
        assert_eq!(loaded.id, record.id);
    }
}
