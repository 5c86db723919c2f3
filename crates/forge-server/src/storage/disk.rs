//! JSON-file generation store
//!
//! One pretty-printed JSON document per generation under the data
//! directory. The whole envelope (steps, tree, edited paths) is written in
//! one piece so a crash can never split the tree from its edit set.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use forge_core::{ForgeError, GenerationStore, Result};
use forge_types::Generation;
use tracing::warn;

#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        // Ids are minted as UUIDs; anything else is refused before it can
        // name a path outside the data directory.
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ForgeError::GenerationNotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    async fn write(&self, generation: &Generation) -> Result<()> {
        let path = self.path_for(&generation.id)?;
        let json = serde_json::to_vec_pretty(generation)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| ForgeError::Storage(format!("write {}: {e}", path.display())))
    }

    async fn read(&self, path: &Path) -> Result<Generation> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ForgeError::Storage(format!("read {}: {e}", path.display())))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl GenerationStore for FileStore {
    async fn create(&self, generation: &Generation) -> Result<()> {
        self.write(generation).await
    }

    async fn get(&self, id: &str) -> Result<Option<Generation>> {
        let path = match self.path_for(id) {
            Ok(path) => path,
            Err(_) => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(self.read(&path).await?))
    }

    async fn update(&self, generation: &Generation) -> Result<()> {
        let path = self.path_for(&generation.id)?;
        if !path.exists() {
            return Err(ForgeError::GenerationNotFound(generation.id.clone()));
        }
        self.write(generation).await
    }

    async fn list(&self) -> Result<Vec<Generation>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| ForgeError::Storage(format!("read_dir {}: {e}", self.dir.display())))?;

        let mut generations = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ForgeError::Storage(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match self.read(&path).await {
                    Ok(generation) => generations.push(generation),
                    // A torn record should not take the whole listing down.
                    Err(e) => warn!("skipping unreadable record {}: {}", path.display(), e),
                }
            }
        }
        generations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(generations)
    }
}
