use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::error::{DocumntrError, Result};
use crate::history::Exchange;

/// Persistence contract for the exchange history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Loads the stored history. A missing file is an empty history.
    async fn load(&self) -> Result<Vec<Exchange>>;

    /// Replaces the stored history with the given list.
    async fn save(&self, exchanges: &[Exchange]) -> Result<()>;
}

/// Flat-file store holding a JSON array of exchanges. Every save rewrites the
/// whole file through a sibling temp path and a rename, so an interrupted
/// write never leaves a torn file behind.
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn load(&self) -> Result<Vec<Exchange>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(DocumntrError::Storage(format!(
                    "failed to read history `{}`: {err}",
                    self.path.display()
                )))
            }
        };

        serde_json::from_str(&content).map_err(|err| {
            DocumntrError::Storage(format!(
                "invalid history file `{}`: {err}",
                self.path.display()
            ))
        })
    }

    async fn save(&self, exchanges: &[Exchange]) -> Result<()> {
        let serialized = serde_json::to_string_pretty(exchanges)?;
        let temp = self.temp_path();
        fs::write(&temp, serialized.as_bytes()).await.map_err(|err| {
            DocumntrError::Storage(format!("failed to write `{}`: {err}", temp.display()))
        })?;
        fs::rename(&temp, &self.path).await.map_err(|err| {
            DocumntrError::Storage(format!(
                "failed to replace `{}`: {err}",
                self.path.display()
            ))
        })
    }
}
