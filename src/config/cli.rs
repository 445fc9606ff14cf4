use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;

/// Reads uploads from the local filesystem, relative to `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_relative_to_base() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("cartola.csv"), b"Fecha\n").unwrap();

        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
        assert_eq!(storage.read_file("cartola.csv").await.unwrap(), b"Fecha\n");
        assert!(matches!(
            storage.read_file("missing.csv").await,
            Err(EtlError::IoError(_))
        ));
    }
}
