use serde::{Deserialize, Serialize};

/// One inventory line.
///
/// `id` is `None` until the item has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub quantity: i32,
    /// Unit price.
    pub price: f64,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: i32, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            quantity,
            price,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// The fixed four-item set served by the sample report endpoint.
    pub fn sample_set() -> Vec<Item> {
        vec![
            Item::new("Apple", 3, 1.50),
            Item::new("Banana", 5, 0.80),
            Item::new("Orange", 2, 1.20),
            Item::new("Mango", 4, 2.30),
        ]
    }
}
