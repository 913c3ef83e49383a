//! Owner-scoped inventory items.
mod repository;
mod service;

pub use repository::*;
pub use service::*;

use serde::{Deserialize, Serialize};

/// Inventory row as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryItem {
    pub id: i64,
    pub user_id: i64,
    pub item_name: String,
    pub description: String,
    pub quantity: i32,
    pub price: f64,
}
