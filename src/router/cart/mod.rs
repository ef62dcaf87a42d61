//! Cart HTTP API.
//!
//! Every endpoint resolves the caller the same way: a valid token wins,
//! then the `Session-Id` header, otherwise the request is anonymous.

mod add;
mod clear;
mod get;
mod remove;
mod update;

use std::collections::HashMap;

use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::cart::Cart;
use crate::item::Item;

/// Create cart router.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // `GET /` goes to `get`.
        .route("/", get(get::handler))
        // `POST /add` goes to `add`.
        .route("/add", post(add::handler))
        // `PUT /update` goes to `update`.
        .route("/update", put(update::handler))
        // `DELETE /remove/:ID` goes to `remove`.
        .route("/remove/{item_id}", delete(remove::handler))
        // `DELETE /clear` goes to `clear`.
        .route("/clear", delete(clear::handler))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::optional_auth,
        ))
}

/// Cart payload with lines expanded into full catalog items.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    items: Vec<Line>,
    total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct Line {
    item: Item,
    quantity: i32,
}

impl Response {
    /// What an anonymous or cart-less caller sees.
    pub fn empty() -> Self {
        Self {
            id: None,
            user_id: None,
            session_id: None,
            items: Vec::new(),
            total_amount: Decimal::ZERO,
            created_at: None,
            updated_at: None,
        }
    }

    /// Expand cart lines against the catalog rows backing them. A line
    /// whose item left the catalog is not shown.
    pub fn expanded(cart: Cart, catalog: &HashMap<Uuid, Item>) -> Self {
        let items = cart
            .items
            .iter()
            .filter_map(|line| {
                catalog.get(&line.item_id).map(|item| Line {
                    item: item.clone(),
                    quantity: line.quantity,
                })
            })
            .collect();

        Self {
            id: Some(cart.id),
            user_id: cart.user_id,
            session_id: cart.session_id,
            items,
            total_amount: cart.total_amount,
            created_at: Some(cart.created_at),
            updated_at: Some(cart.updated_at),
        }
    }
}
