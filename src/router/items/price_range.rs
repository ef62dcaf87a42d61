use axum::Json;
use axum::extract::State;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::AppState;
use crate::error::Result;
use crate::item::ItemRepository;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    min_price: Decimal,
    max_price: Decimal,
}

/// Handler to report the lowest and highest catalog price.
pub async fn handler(State(state): State<AppState>) -> Result<Json<Response>> {
    let (min_price, max_price) = ItemRepository::new(state.db.postgres.clone())
        .price_range()
        .await?;

    Ok(Json(Response {
        min_price,
        max_price,
    }))
}
