use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::store::{RecordStore, StoredRecord};

const HISTORY_VERSION: u64 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    version: u64,
    #[serde(default)]
    records: BTreeMap<String, StoredRecord>,
}

impl Default for HistoryFile {
    fn default() -> Self {
        Self {
            version: HISTORY_VERSION,
            records: BTreeMap::new(),
        }
    }
}

/// History kept in a single JSON document, one entry per report date.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_DATA_HOME/costwatch/history.json`, falling back to `~/.local/share`.
    pub fn default_path() -> PathBuf {
        let base = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".local")
                    .join("share")
            });
        base.join("costwatch").join("history.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HistoryFile> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HistoryFile::default())
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read history from {}", self.path.display()))
            }
        };

        // A corrupt file is an error rather than an empty history, so a put
        // never silently discards earlier days.
        let history: HistoryFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse history at {}", self.path.display()))?;
        if history.version != HISTORY_VERSION {
            anyhow::bail!(
                "Unsupported history version {} in {}",
                history.version,
                self.path.display()
            );
        }
        Ok(history)
    }

    async fn write(&self, history: &HistoryFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(history).context("Failed to serialize history")?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write history to {}", tmp.display()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                tracing::debug!("Failed to remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e).with_context(|| format!("Failed to replace {}", self.path.display()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn put(&self, record: StoredRecord) -> Result<()> {
        let mut history = self.load().await?;
        let key = record.key();
        if history.records.insert(key.clone(), record).is_some() {
            tracing::debug!("Replacing existing history entry for {}", key);
        }
        self.write(&history).await
    }

    async fn get(&self, date: NaiveDate) -> Result<Option<StoredRecord>> {
        let mut history = self.load().await?;
        Ok(history.records.remove(&date.format("%Y-%m-%d").to_string()))
    }

    async fn list(&self) -> Result<Vec<StoredRecord>> {
        let history = self.load().await?;
        Ok(history.records.into_values().collect())
    }
}
