use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::Response;
use crate::cart::{CartIdentity, CartService};
use crate::error::Result;
use crate::router::Valid;
use crate::{AppState, ServerError};

/// Body to set the quantity of a line; zero or less removes it.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    item_id: Uuid,
    quantity: i32,
}

/// Handler to replace the quantity of a line.
pub async fn handler(
    State(state): State<AppState>,
    identity: CartIdentity,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    let service = CartService::new(state.db.postgres.clone());

    let mut cart = service
        .resolve(&identity)
        .await?
        .ok_or(ServerError::NotFound("Cart not found"))?;

    if !cart.set_quantity(body.item_id, body.quantity) {
        return Err(ServerError::NotFound("Item not found in cart"));
    }

    let catalog = service.persist(&mut cart).await?;

    Ok(Json(Response::expanded(cart, &catalog)))
}

#[cfg(test)]
pub(super) mod tests {
    use crate::*;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn anonymous_caller_has_no_cart_to_update() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::PUT,
            "/api/cart/update",
            None,
            None,
            json!({ "itemId": Uuid::new_v4(), "quantity": 2 }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Cart not found");
    }
}
