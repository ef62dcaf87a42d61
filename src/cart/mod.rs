mod identity;
mod repository;
mod service;

pub use identity::*;
pub use repository::*;
pub use service::*;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a cart: an item reference and how many of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: Uuid,
    pub quantity: i32,
}

/// Cart as saved on database. Lines live in a JSONB column; `total_amount`
/// is derived from current catalog prices on every save.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub session_id: Option<String>,
    #[sqlx(json)]
    pub items: Vec<CartLine>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    fn new() -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id: None,
            session_id: None,
            items: Vec::new(),
            total_amount: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Empty cart owned by an account.
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::new()
        }
    }

    /// Empty cart owned by a guest session.
    pub fn for_session(session_id: &str) -> Self {
        Self {
            session_id: Some(session_id.to_owned()),
            ..Self::new()
        }
    }

    /// Add `quantity` of an item, accumulating onto an existing line.
    pub fn add_line(&mut self, item_id: Uuid, quantity: i32) {
        match self.items.iter_mut().find(|line| line.item_id == item_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartLine { item_id, quantity }),
        }
    }

    /// Set the quantity of an existing line; zero or less removes it.
    ///
    /// Returns `false` when the item has no line on this cart.
    pub fn set_quantity(&mut self, item_id: Uuid, quantity: i32) -> bool {
        let Some(position) = self.items.iter().position(|line| line.item_id == item_id) else {
            return false;
        };

        if quantity <= 0 {
            self.items.remove(position);
        } else {
            self.items[position].quantity = quantity;
        }

        true
    }

    /// Drop the line for an item. Absent items are a no-op.
    pub fn remove_line(&mut self, item_id: Uuid) {
        self.items.retain(|line| line.item_id != item_id);
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Hand a guest cart over to an account, detaching it from its session.
    pub fn adopt(&mut self, user_id: Uuid) {
        self.user_id = Some(user_id);
        self.session_id = None;
    }

    /// Derive `total_amount` from the given catalog prices.
    ///
    /// A line whose item is gone from the catalog contributes nothing.
    pub fn recompute_total(&mut self, prices: &HashMap<Uuid, Decimal>) {
        self.total_amount = self
            .items
            .iter()
            .filter_map(|line| {
                prices
                    .get(&line.item_id)
                    .map(|price| *price * Decimal::from(line.quantity))
            })
            .sum();
    }
}
