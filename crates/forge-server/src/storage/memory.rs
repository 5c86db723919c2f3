//! In-memory generation store using DashMap

use async_trait::async_trait;
use dashmap::DashMap;
use forge_core::{ForgeError, GenerationStore, Result};
use forge_types::Generation;

/// Volatile store; useful for tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: DashMap<String, Generation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GenerationStore for MemoryStore {
    async fn create(&self, generation: &Generation) -> Result<()> {
        self.data
            .insert(generation.id.clone(), generation.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Generation>> {
        Ok(self.data.get(id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, generation: &Generation) -> Result<()> {
        if !self.data.contains_key(&generation.id) {
            return Err(ForgeError::GenerationNotFound(generation.id.clone()));
        }
        self.data
            .insert(generation.id.clone(), generation.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Generation>> {
        let mut generations: Vec<Generation> =
            self.data.iter().map(|entry| entry.value().clone()).collect();
        generations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(generations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_get_round_trip() {
        let store = MemoryStore::new();
        let generation = Generation::new("g-1", "todo app", "test-model", "<raw>");

        store.create(&generation).await.unwrap();
        let loaded = store.get("g-1").await.unwrap().unwrap();
        assert_eq!(loaded, generation);

        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_requires_existing_record() {
        let store = MemoryStore::new();
        let mut generation = Generation::new("g-1", "p", "m", "o");

        assert!(matches!(
            store.update(&generation).await,
            Err(ForgeError::GenerationNotFound(_))
        ));

        store.create(&generation).await.unwrap();
        generation.selected_path = Some("/index.html".to_string());
        store.update(&generation).await.unwrap();

        let loaded = store.get("g-1").await.unwrap().unwrap();
        assert_eq!(loaded.selected_path.as_deref(), Some("/index.html"));
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = MemoryStore::new();
        let mut older = Generation::new("g-old", "p", "m", "o");
        older.created_at = older.created_at - chrono::Duration::minutes(5);
        store.create(&older).await.unwrap();
        let newer = Generation::new("g-new", "p", "m", "o");
        store.create(&newer).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "g-new");
    }
}
