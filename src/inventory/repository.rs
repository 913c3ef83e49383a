//! Handle database requests.
//!
//! Every statement filters on the owning user id.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::error::Result;
use crate::inventory::InventoryItem;
use crate::model::body::ItemFields;

/// Port for inventory persistence.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Insert an item owned by `owner` and return its id.
    async fn insert(&self, owner: i64, fields: &ItemFields) -> Result<i64>;

    /// Items owned by `owner`, ordered by id.
    async fn list_by_owner(&self, owner: i64) -> Result<Vec<InventoryItem>>;

    /// Replace the fields of item `id` if `owner` owns it.
    /// Returns the number of rows affected.
    async fn update(
        &self,
        owner: i64,
        id: i64,
        fields: &ItemFields,
    ) -> Result<u64>;

    /// Delete item `id` if `owner` owns it.
    /// Returns the number of rows affected.
    async fn delete(&self, owner: i64, id: i64) -> Result<u64>;
}

/// PostgreSQL inventory repository.
#[derive(Clone)]
pub struct PgInventoryRepository {
    pool: Pool<Postgres>,
}

impl PgInventoryRepository {
    /// Create a new [`PgInventoryRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    async fn insert(&self, owner: i64, fields: &ItemFields) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO inventory (user_id, item_name, description, quantity, price)
                VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
        )
        .bind(owner)
        .bind(&fields.item_name)
        .bind(&fields.description)
        .bind(fields.quantity)
        .bind(fields.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_by_owner(&self, owner: i64) -> Result<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"SELECT id, user_id, item_name, description, quantity, price
                FROM inventory WHERE user_id = $1 ORDER BY id"#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn update(
        &self,
        owner: i64,
        id: i64,
        fields: &ItemFields,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"UPDATE inventory
                SET item_name = $1, description = $2, quantity = $3, price = $4
                WHERE id = $5 AND user_id = $6"#,
        )
        .bind(&fields.item_name)
        .bind(&fields.description)
        .bind(fields.quantity)
        .bind(fields.price)
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, owner: i64, id: i64) -> Result<u64> {
        let result =
            sqlx::query(r#"DELETE FROM inventory WHERE id = $1 AND user_id = $2"#)
                .bind(id)
                .bind(owner)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct Table {
        next_id: i64,
        rows: Vec<InventoryItem>,
    }

    /// Items kept in a vector, ids assigned from 1.
    #[derive(Debug, Default)]
    pub struct MemoryInventoryRepository {
        table: Mutex<Table>,
    }

    impl MemoryInventoryRepository {
        /// Every row regardless of owner.
        pub fn all(&self) -> Vec<InventoryItem> {
            self.table.lock().unwrap().rows.clone()
        }
    }

    #[async_trait]
    impl InventoryRepository for MemoryInventoryRepository {
        async fn insert(&self, owner: i64, fields: &ItemFields) -> Result<i64> {
            let mut table = self.table.lock().unwrap();
            table.next_id += 1;
            let id = table.next_id;
            table.rows.push(InventoryItem {
                id,
                user_id: owner,
                item_name: fields.item_name.clone(),
                description: fields.description.clone(),
                quantity: fields.quantity,
                price: fields.price,
            });

            Ok(id)
        }

        async fn list_by_owner(
            &self,
            owner: i64,
        ) -> Result<Vec<InventoryItem>> {
            Ok(self
                .table
                .lock()
                .unwrap()
                .rows
                .iter()
                .filter(|item| item.user_id == owner)
                .cloned()
                .collect())
        }

        async fn update(
            &self,
            owner: i64,
            id: i64,
            fields: &ItemFields,
        ) -> Result<u64> {
            let mut table = self.table.lock().unwrap();
            let mut affected = 0;
            for item in table
                .rows
                .iter_mut()
                .filter(|item| item.id == id && item.user_id == owner)
            {
                item.item_name = fields.item_name.clone();
                item.description = fields.description.clone();
                item.quantity = fields.quantity;
                item.price = fields.price;
                affected += 1;
            }

            Ok(affected)
        }

        async fn delete(&self, owner: i64, id: i64) -> Result<u64> {
            let mut table = self.table.lock().unwrap();
            let before = table.rows.len();
            table
                .rows
                .retain(|item| !(item.id == id && item.user_id == owner));

            Ok((before - table.rows.len()) as u64)
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::user::{NewUser, PgUserRepository, UserRepository};

    fn widget() -> ItemFields {
        ItemFields {
            item_name: "Widget".into(),
            description: String::new(),
            quantity: 5,
            price: 9.99,
        }
    }

    async fn user(pool: &Pool<Postgres>, username: &str) -> i64 {
        PgUserRepository::new(pool.clone())
            .insert(&NewUser {
                username: username.into(),
                email: format!("{username}@x.com"),
                password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA"
                    .into(),
            })
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL instance at DATABASE_URL"]
    async fn test_owner_scoping(pool: Pool<Postgres>) {
        let alice = user(&pool, "alice01").await;
        let bob = user(&pool, "bobby01").await;
        let repo = PgInventoryRepository::new(pool);

        let id = repo.insert(alice, &widget()).await.unwrap();
        repo.insert(bob, &widget()).await.unwrap();

        let items = repo.list_by_owner(alice).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, id);
        assert_eq!(items[0].price, 9.99);

        let renamed = ItemFields {
            item_name: "Gadget".into(),
            ..widget()
        };
        assert_eq!(repo.update(bob, id, &renamed).await.unwrap(), 0);
        assert_eq!(repo.delete(bob, id).await.unwrap(), 0);
        assert_eq!(repo.update(alice, id, &renamed).await.unwrap(), 1);
        assert_eq!(
            repo.list_by_owner(alice).await.unwrap()[0].item_name,
            "Gadget"
        );
        assert_eq!(repo.delete(alice, id).await.unwrap(), 1);
        assert!(repo.list_by_owner(alice).await.unwrap().is_empty());
    }
}
