use super::ItemRepository;
use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use inventory_types::Item;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

/// SQLite implementation of ItemRepository
pub struct SqliteItemRepository {
    pool: SqlitePool,
}

impl SqliteItemRepository {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let mut options = SqlitePoolOptions::new().max_connections(max_connections);
        // Every connection to `sqlite::memory:` opens its own database, so
        // keep exactly one alive for the lifetime of the pool.
        if database_url.contains(":memory:") {
            options = options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = options
            .connect(database_url)
            .await
            .map_err(ServiceError::Database)?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        let migration_sql = include_str!("../../migrations/001_init.sql");

        sqlx::raw_sql(migration_sql)
            .execute(&self.pool)
            .await
            .map_err(ServiceError::Database)?;

        tracing::info!("Database migrations completed");
        Ok(())
    }
}

fn item_from_row(row: &SqliteRow) -> Item {
    Item {
        id: row.get("id"),
        name: row.get("name"),
        quantity: row.get("quantity"),
        price: row.get("price"),
    }
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    async fn find_all(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query("SELECT id, name, quantity, price FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(ServiceError::Database)?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Item>> {
        let row = sqlx::query("SELECT id, name, quantity, price FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(ServiceError::Database)?;

        Ok(row.as_ref().map(item_from_row))
    }

    async fn save(&self, item: Item) -> Result<Item> {
        let id = match item.id {
            None => sqlx::query("INSERT INTO items (name, quantity, price) VALUES (?, ?, ?)")
                .bind(&item.name)
                .bind(item.quantity)
                .bind(item.price)
                .execute(&self.pool)
                .await
                .map_err(ServiceError::Database)?
                .last_insert_rowid(),
            Some(id) => {
                sqlx::query(
                    r#"
                    INSERT INTO items (id, name, quantity, price) VALUES (?, ?, ?, ?)
                    ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        quantity = excluded.quantity,
                        price = excluded.price
                    "#,
                )
                .bind(id)
                .bind(&item.name)
                .bind(item.quantity)
                .bind(item.price)
                .execute(&self.pool)
                .await
                .map_err(ServiceError::Database)?;
                id
            }
        };

        tracing::debug!("Saved item {} ('{}')", id, item.name);
        Ok(item.with_id(id))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(ServiceError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM items")
            .fetch_one(&self.pool)
            .await
            .map_err(ServiceError::Database)?;

        Ok(row.get("count"))
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(ServiceError::Database)?;
        Ok(())
    }
}
