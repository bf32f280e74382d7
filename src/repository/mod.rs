//! Persistence of inventory items.

mod memory;
mod sqlite;

pub use memory::InMemoryItemRepository;
pub use sqlite::SqliteItemRepository;

use crate::error::Result;
use async_trait::async_trait;
use inventory_types::Item;

/// Storage of inventory items.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items, ordered by id.
    async fn find_all(&self) -> Result<Vec<Item>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Item>>;

    /// Inserts when `item.id` is `None`, otherwise inserts or replaces the
    /// row with that id. Returns the persisted item.
    async fn save(&self, item: Item) -> Result<Item>;

    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool>;

    async fn count(&self) -> Result<i64>;

    /// Fails when the backing store is unreachable.
    async fn health_check(&self) -> Result<()> {
        self.count().await.map(|_| ())
    }
}
