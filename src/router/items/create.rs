use axum::http::StatusCode;
use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::item::{DEFAULT_IMAGE, Item, ItemRepository, NewItem};
use crate::router::Valid;

/// Body to add an item to the catalog.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, max = 120, message = "Name is required."))]
    name: String,
    #[validate(length(min = 1, message = "Description is required."))]
    description: String,
    #[validate(custom(
        function = "crate::router::items::validate_price",
        message = "Price must not be negative."
    ))]
    price: Decimal,
    #[validate(length(min = 1, message = "Category is required."))]
    category: String,
    image: Option<String>,
    in_stock: Option<bool>,
    stock: Option<i32>,
}

/// Handler to create an item. Admin only.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Item>)> {
    let item = ItemRepository::new(state.db.postgres.clone())
        .insert(&NewItem {
            name: body.name,
            description: body.description,
            price: body.price,
            category: body.category,
            image: body.image.unwrap_or_else(|| DEFAULT_IMAGE.to_owned()),
            in_stock: body.in_stock.unwrap_or(true),
            stock: body.stock.unwrap_or(100),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}
