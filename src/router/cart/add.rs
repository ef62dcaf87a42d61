use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::Response;
use crate::AppState;
use crate::cart::{CartIdentity, CartService};
use crate::error::Result;
use crate::router::Valid;

/// Body to put an item in the cart.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    item_id: Uuid,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Handler to add an item, accumulating onto an existing line.
pub async fn handler(
    State(state): State<AppState>,
    identity: CartIdentity,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    let service = CartService::new(state.db.postgres.clone());

    let mut cart = service.resolve_or_create(&identity).await?;
    service.ensure_item(body.item_id).await?;

    cart.add_line(body.item_id, body.quantity);
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
    async fn anonymous_caller_cannot_add() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::POST,
            "/api/cart/add",
            None,
            None,
            json!({ "itemId": Uuid::new_v4() }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Validation error");
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::POST,
            "/api/cart/add",
            None,
            Some("session-under-test"),
            json!({ "itemId": Uuid::new_v4(), "quantity": 0 }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
