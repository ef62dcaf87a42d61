mod repository;

pub use repository::*;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Image applied when a new item does not carry one.
pub const DEFAULT_IMAGE: &str = "https://plus.unsplash.com/premium_photo-1678099940967-73fe30680949?q=80&w=1170&auto=format&fit=crop&ixlib=rb-4.1.0";

/// Catalog item as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image: String,
    pub in_stock: bool,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when inserting a new catalog item.
#[derive(Clone, Debug)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image: String,
    pub in_stock: bool,
    pub stock: i32,
}
