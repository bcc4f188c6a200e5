use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use std::path::{Path, PathBuf};

/// Reads relative to the working directory, writes under `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(Path::new(path))
            .await
            .map_err(|e| EtlError::InputUnavailable {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.output_file(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}
