use crate::error::Result;
use crate::repository::ItemRepository;
use inventory_types::Item;

/// The starter inventory written into an empty store.
pub fn initial_items() -> Vec<Item> {
    vec![
        Item::new("Apple", 3, 1.50),
        Item::new("Banana", 5, 0.80),
        Item::new("Orange", 2, 1.20),
        Item::new("Mango", 4, 2.30),
        Item::new("Grapes", 6, 3.50),
        Item::new("Pineapple", 1, 4.00),
    ]
}

/// Inserts [`initial_items`] when the repository holds no items.
///
/// Returns the number of items inserted.
pub async fn seed_if_empty(repository: &dyn ItemRepository) -> Result<usize> {
    if repository.count().await? > 0 {
        tracing::debug!("Repository already populated, skipping seed");
        return Ok(0);
    }

    let items = initial_items();
    let inserted = items.len();
    for item in items {
        repository.save(item).await?;
    }
    tracing::info!("Seeded {} inventory items", inserted);
    Ok(inserted)
}
