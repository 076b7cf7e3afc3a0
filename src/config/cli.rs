use crate::domain::ports::Storage;
use crate::utils::error::{AnalysisError, Result};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    /// Storage rooted at the file's directory, plus the file's name within it.
    pub fn for_file(path: &str) -> Result<(Self, String)> {
        let path = Path::new(path);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| AnalysisError::InvalidConfigValueError {
                field: "input".to_string(),
                value: path.display().to_string(),
                reason: "Path does not name a file".to_string(),
            })?;
        let base = path
            .parent()
            .map(|parent| parent.display().to_string())
            .unwrap_or_default();
        Ok((Self::new(base), name))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(full_path, data).await?;
        Ok(())
    }

    fn location(&self, path: &str) -> String {
        Path::new(&self.base_path).join(path).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_creates_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested").display().to_string());

        storage.write_file("a/report.json", b"{}").await.unwrap();
        let data = storage.read_file("a/report.json").await.unwrap();

        assert_eq!(data, b"{}");
        assert!(storage.location("a/report.json").ends_with("report.json"));
    }

    #[tokio::test]
    async fn test_for_file_reads_input_by_full_path() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("transactions.csv");
        std::fs::write(&input, "date,revenue,expense\n").unwrap();

        let (storage, name) = LocalStorage::for_file(&input.display().to_string()).unwrap();
        assert_eq!(name, "transactions.csv");
        assert_eq!(
            storage.read_file(&name).await.unwrap(),
            b"date,revenue,expense\n"
        );
    }

    #[test]
    fn test_for_file_bare_name_is_relative() {
        let (storage, name) = LocalStorage::for_file("data.csv").unwrap();
        assert_eq!(name, "data.csv");
        assert_eq!(storage.location(&name), "data.csv");
        assert!(LocalStorage::for_file("/").is_err());
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().display().to_string());
        assert!(matches!(
            storage.read_file("nope.pdf").await,
            Err(crate::utils::error::AnalysisError::IoError(_))
        ));
    }
}
