use axum::Json;
use axum::extract::{Path, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::Result;
use crate::item::{Item, ItemRepository};
use crate::router::Valid;
use crate::{AppState, ServerError};

/// Body to change an item; absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, max = 120, message = "Name is required."))]
    name: Option<String>,
    #[validate(length(min = 1, message = "Description is required."))]
    description: Option<String>,
    #[validate(custom(
        function = "crate::router::items::validate_price",
        message = "Price must not be negative."
    ))]
    price: Option<Decimal>,
    #[validate(length(min = 1, message = "Category is required."))]
    category: Option<String>,
    image: Option<String>,
    in_stock: Option<bool>,
    stock: Option<i32>,
}

/// Handler to update an item. Admin only.
pub async fn handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Valid(body): Valid<Body>,
) -> Result<Json<Item>> {
    let item_id = super::parse_item_id(&item_id)?;
    let repository = ItemRepository::new(state.db.postgres.clone());

    let mut item = repository
        .find_by_id(item_id)
        .await?
        .ok_or(ServerError::NotFound("Item not found"))?;

    if let Some(name) = body.name {
        item.name = name;
    }
    if let Some(description) = body.description {
        item.description = description;
    }
    if let Some(price) = body.price {
        item.price = price;
    }
    if let Some(category) = body.category {
        item.category = category;
    }
    if let Some(image) = body.image {
        item.image = image;
    }
    if let Some(in_stock) = body.in_stock {
        item.in_stock = in_stock;
    }
    if let Some(stock) = body.stock {
        item.stock = stock;
    }

    let item = repository
        .update(&item)
        .await?
        .ok_or(ServerError::NotFound("Item not found"))?;

    Ok(Json(item))
}

#[cfg(test)]
pub(super) mod tests {
    use crate::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn updating_without_a_token_is_unauthorized() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::PUT,
            "/api/items/4cd8d93a-8a3f-4968-9d9b-7e318a69e7c8",
            None,
            None,
            json!({ "price": 9.99 }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
