//! File-based storage.

use super::{Storage, StorageError, StorageResult};
use crate::document::ProjectDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores projects as pretty-printed JSON files in one directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for project files.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the per-user data directory
    /// (for example `~/.local/share/hudsketch/projects/`).
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("hudsketch").join("projects"))
    }

    /// File path for a project ID. Characters unsafe in file names become `_`.
    fn document_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write a document to an explicit path (the "Save as" case).
    pub fn save_to_path(path: &Path, document: &ProjectDocument) -> StorageResult<()> {
        let json = document.to_json()?;
        fs::write(path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
    }

    /// Read a document from an explicit path.
    pub fn load_from_path(path: &Path) -> StorageResult<ProjectDocument> {
        if !path.exists() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        let json = fs::read_to_string(path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
        ProjectDocument::from_json(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {e}", path.display()))
        })
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, document: &ProjectDocument) -> StorageResult<()> {
        Self::save_to_path(&self.document_path(id), document)
    }

    fn load(&self, id: &str) -> StorageResult<ProjectDocument> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Self::load_from_path(&path)
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let path = self.document_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {e}", path.display()))
            })?;
        }
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;

        let ids = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        Ok(ids)
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.document_path(id).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::ShapeGroup;
    use crate::shapes::{Shape, ShapeStyle};
    use kurbo::Point;
    use tempfile::tempdir;

    fn sample() -> ProjectDocument {
        ProjectDocument {
            shapes: vec![Shape::circle(Point::new(50.0, 50.0), 20.0, ShapeStyle::default())],
            groups: vec![ShapeGroup::new("ring", [0])],
            canvas_limits: None,
        }
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        storage.save("test-doc", &sample()).unwrap();
        let loaded = storage.load("test-doc").unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(matches!(storage.load("nonexistent"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_list() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        storage.save("doc1", &sample()).unwrap();
        storage.save("doc2", &sample()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let list = storage.list().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&"doc1".to_string()));
        assert!(list.contains(&"doc2".to_string()));
    }

    #[test]
    fn test_file_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        storage.save("test", &sample()).unwrap();
        assert!(storage.exists("test").unwrap());

        storage.delete("test").unwrap();
        assert!(!storage.exists("test").unwrap());
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        storage.save("test/doc:with*special", &sample()).unwrap();
        assert!(dir.path().join("test_doc_with_special.json").exists());
        assert_eq!(storage.load("test/doc:with*special").unwrap(), sample());
    }

    #[test]
    fn test_malformed_file_is_serialization_error() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("broken.json"), r#"{"version": "2.3"}"#).unwrap();
        assert!(matches!(storage.load("broken"), Err(StorageError::Serialization(_))));
    }
}
