use super::ItemRepository;
use crate::error::Result;
use async_trait::async_trait;
use inventory_types::Item;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Process-local item store, keyed and ordered by id.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    items: BTreeMap<i64, Item>,
    last_id: i64,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn find_all(&self) -> Result<Vec<Item>> {
        Ok(self.state.read().await.items.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Item>> {
        Ok(self.state.read().await.items.get(&id).cloned())
    }

    async fn save(&self, item: Item) -> Result<Item> {
        let mut state = self.state.write().await;
        let id = match item.id {
            Some(id) => id,
            None => state.last_id + 1,
        };
        // Ids never go backwards, even after an explicit upsert.
        state.last_id = state.last_id.max(id);

        let item = item.with_id(id);
        state.items.insert(id, item.clone());
        Ok(item)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.state.write().await.items.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.state.read().await.items.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_assigns_ids_and_upserts() {
        let repo = InMemoryItemRepository::new();
        let apple = repo.save(Item::new("Apple", 3, 1.5)).await.unwrap();
        assert_eq!(apple.id, Some(1));

        repo.save(Item::new("Apple", 10, 1.5).with_id(1)).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().quantity, 10);

        repo.save(Item::new("Kiwi", 7, 0.25).with_id(10)).await.unwrap();
        let next = repo.save(Item::new("Lime", 1, 0.4)).await.unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_and_delete_removes() {
        let repo = InMemoryItemRepository::new();
        repo.save(Item::new("Mango", 4, 2.3).with_id(3)).await.unwrap();
        repo.save(Item::new("Apple", 3, 1.5).with_id(1)).await.unwrap();

        let ids: Vec<Option<i64>> = repo.find_all().await.unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, [Some(1), Some(3)]);

        assert!(repo.delete_by_id(1).await.unwrap());
        assert!(!repo.delete_by_id(1).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
