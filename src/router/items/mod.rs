//! Catalog HTTP API.
//!
//! Reads are public; mutations require an authenticated admin.

mod create;
mod delete;
mod get;
mod list;
mod price_range;
mod update;

use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::ValidationError;

use crate::{AppState, ServerError};

/// Create catalog router.
pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        // `POST /` goes to `create`. Admin required.
        .route("/", post(create::handler))
        // `PUT /:ID` goes to `update`. Admin required.
        .route("/{item_id}", put(update::handler))
        // `DELETE /:ID` goes to `delete`. Admin required.
        .route("/{item_id}", delete(delete::handler))
        .route_layer(middleware::from_fn(crate::middleware::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::require_auth,
        ));

    Router::new()
        // `GET /` goes to `list`.
        .route("/", get(list::handler))
        // `GET /stats/price-range` goes to `price_range`.
        .route("/stats/price-range", get(price_range::handler))
        // `GET /:ID` goes to `get`.
        .route("/{item_id}", get(get::handler))
        .merge(admin)
}

/// An id that is not a UUID cannot name an item.
fn parse_item_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw).map_err(|_| ServerError::NotFound("Item not found"))
}

/// Used by `create` and `update` bodies.
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("negative_price"));
    }

    Ok(())
}
