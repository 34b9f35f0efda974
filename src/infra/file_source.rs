use crate::app::ports::RecordSource;
use crate::error::{DirectoryError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads the table from a local CSV export
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DirectoryError::Transport {
                source_name: self.describe(),
                message: e.to_string(),
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
